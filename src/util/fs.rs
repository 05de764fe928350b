//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};

use crate::util::errors::WattbuildError;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), WattbuildError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| WattbuildError::io("create directory", path, e))?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<(), WattbuildError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| WattbuildError::io("write file", path, e))
}

/// Copy `src` into the directory `dst_dir`, keeping its file name.
///
/// Returns the destination path.
pub fn copy_into(src: &Path, dst_dir: &Path) -> Result<PathBuf, WattbuildError> {
    let file_name = src
        .file_name()
        .ok_or_else(|| WattbuildError::io("copy", src, std::io::ErrorKind::InvalidInput.into()))?;
    let dst = dst_dir.join(file_name);
    fs::copy(src, &dst).map_err(|e| WattbuildError::io("copy", src, e))?;
    Ok(dst)
}

/// Find files in `dir` with the given extension (non-recursive), sorted.
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, WattbuildError> {
    let pattern_str = format!(
        "{}/*.{extension}",
        Pattern::escape(&dir.to_string_lossy())
    );

    let entries = glob(&pattern_str).map_err(|e| {
        WattbuildError::io(
            "glob",
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
        )
    })?;

    let mut results = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    results.sort();
    Ok(results)
}
