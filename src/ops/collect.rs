//! Copying compiled artifacts to the destination directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::artifact::{artifact_file_name, lib_target, ARTIFACT_EXTENSION};
use crate::core::metadata::Package;
use crate::util::errors::WattbuildError;
use crate::util::fs::{copy_into, ensure_dir, files_with_extension};

/// Copy exactly one artifact per package.
///
/// Every package must have a `cdylib` target whose artifact exists in
/// `release_dir`, and no two packages may share an artifact file name.
/// All of them are checked before anything is copied.
pub fn collect_precise(
    packages: &[&Package],
    release_dir: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, WattbuildError> {
    let mut owners: HashMap<String, &Package> = HashMap::with_capacity(packages.len());
    let mut sources = Vec::with_capacity(packages.len());
    for package in packages {
        let target = lib_target(package)?;
        let file = artifact_file_name(&target.name);
        if let Some(first) = owners.get(&file) {
            return Err(WattbuildError::DuplicateArtifact {
                file,
                first: first.id.to_string(),
                second: package.id.to_string(),
            });
        }
        let path = release_dir.join(&file);
        if !path.is_file() {
            return Err(WattbuildError::MissingArtifact {
                package: package.id.to_string(),
                path,
            });
        }
        sources.push(path);
        owners.insert(file, *package);
    }

    copy_all(&sources, out_dir)
}

/// Copy every `.wasm` file in `release_dir`.
///
/// Leftovers from earlier builds in a persistent working directory are
/// copied too, and a package that produced nothing goes unnoticed.
pub fn collect_broad(release_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, WattbuildError> {
    let sources = files_with_extension(release_dir, ARTIFACT_EXTENSION)?;
    if sources.is_empty() {
        tracing::warn!("No .{} files in {}", ARTIFACT_EXTENSION, release_dir.display());
    }
    copy_all(&sources, out_dir)
}

fn copy_all(sources: &[PathBuf], out_dir: &Path) -> Result<Vec<PathBuf>, WattbuildError> {
    ensure_dir(out_dir)?;

    let mut copied = sources
        .iter()
        .map(|src| copy_into(src, out_dir))
        .collect::<Result<Vec<_>, _>>()?;
    copied.sort();
    Ok(copied)
}
