//! Scratch directory that holds the synthesized package.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::util::config::ScratchDir;
use crate::util::errors::WattbuildError;
use crate::util::fs::ensure_dir;

/// An acquired working directory.
///
/// A temporary directory is deleted when this value is dropped; a
/// persistent one is left in place for the next invocation.
#[derive(Debug)]
pub enum Workdir {
    Persistent(PathBuf),
    Temporary(TempDir),
}

impl Workdir {
    /// Acquire the working directory described by `scratch`.
    pub fn acquire(scratch: &ScratchDir) -> Result<Self, WattbuildError> {
        match scratch {
            ScratchDir::Persistent(path) => {
                ensure_dir(path)?;
                Ok(Workdir::Persistent(path.clone()))
            }
            ScratchDir::Temporary => {
                let dir = tempfile::Builder::new()
                    .prefix("wattbuild-")
                    .tempdir()
                    .map_err(|e| WattbuildError::io("create directory", std::env::temp_dir(), e))?;
                Ok(Workdir::Temporary(dir))
            }
        }
    }

    /// Path of the working directory.
    pub fn path(&self) -> &Path {
        match self {
            Workdir::Persistent(path) => path,
            Workdir::Temporary(dir) => dir.path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_survives_drop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache").join("wattbuild");

        let workdir = Workdir::acquire(&ScratchDir::Persistent(path.clone())).unwrap();
        assert_eq!(workdir.path(), path);
        drop(workdir);

        assert!(path.is_dir());
    }

    #[test]
    fn test_temporary_removed_on_drop() {
        let workdir = Workdir::acquire(&ScratchDir::Temporary).unwrap();
        let path = workdir.path().to_path_buf();
        assert!(path.is_dir());

        drop(workdir);

        assert!(!path.exists());
    }
}
