//! Error types for a wattbuild invocation.
//!
//! Every failure is fatal. The variants group into four families:
//! environment (a program or variable is missing), toolchain (an external
//! command exited non-zero), metadata (see [`MetadataError`]) and artifact
//! mismatch (a root package produced nothing we can collect).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::metadata::MetadataError;

/// Error raised while building WebAssembly artifacts.
#[derive(Debug, Error)]
pub enum WattbuildError {
    #[error("`{program}` not found")]
    ProgramNotFound { program: String },

    #[error("environment variable `{name}` is not set")]
    MissingEnv { name: &'static str },

    #[error("no cache directory available for the working directory")]
    NoCacheDir,

    #[error("no build dependencies given")]
    NoDependencies,

    #[error("could not execute `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed with exit code {code:?}\n{stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("invalid `cargo metadata` output")]
    Metadata(#[from] MetadataError),

    #[error("`{package}` has no `cdylib` target")]
    MissingLibTarget { package: String },

    #[error("artifact of `{package}` not found: {}", path.display())]
    MissingArtifact { package: String, path: PathBuf },

    #[error("`{first}` and `{second}` both produce `{file}`")]
    DuplicateArtifact {
        file: String,
        first: String,
        second: String,
    },

    #[error("failed to {action} `{}`", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WattbuildError {
    /// Wrap an I/O error with the action and path that caused it.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WattbuildError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lib_target_names_package() {
        let err = WattbuildError::MissingLibTarget {
            package: "watt-demo 0.0.0 (git+https://github.com/dtolnay/watt)".to_string(),
        };
        assert!(err.to_string().contains("watt-demo 0.0.0"));
    }

    #[test]
    fn test_command_failed_keeps_stderr() {
        let err = WattbuildError::CommandFailed {
            command: "cargo update".to_string(),
            code: Some(101),
            stderr: "error: no matching package named `_0` found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("`cargo update` failed"));
        assert!(msg.contains("no matching package named `_0` found"));
    }

    #[test]
    fn test_duplicate_artifact_names_both_packages() {
        let err = WattbuildError::DuplicateArtifact {
            file: "serde.wasm".to_string(),
            first: "serde 1.0.200".to_string(),
            second: "serde 0.9.15".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`serde 1.0.200` and `serde 0.9.15` both produce `serde.wasm`"
        );
    }
}
