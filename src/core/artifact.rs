//! Compiled artifact naming.

use crate::core::metadata::{Package, Target};
use crate::util::errors::WattbuildError;

/// Compilation target for the built crates.
pub const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Extension of compiled artifacts.
pub const ARTIFACT_EXTENSION: &str = "wasm";

/// Target kind of a library that can be loaded at runtime.
pub const LIB_KIND: &str = "cdylib";

/// File name of the artifact produced for a library target.
///
/// Cargo replaces `-` with `_` in crate names.
pub fn artifact_file_name(target_name: &str) -> String {
    format!("{}.{}", target_name.replace('-', "_"), ARTIFACT_EXTENSION)
}

/// The `cdylib` target of a package.
pub fn lib_target(package: &Package) -> Result<&Target, WattbuildError> {
    package
        .targets
        .iter()
        .find(|t| t.kind.iter().any(|k| k == LIB_KIND))
        .ok_or_else(|| WattbuildError::MissingLibTarget {
            package: package.id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::PackageId;
    use semver::Version;

    fn package(targets: Vec<Target>) -> Package {
        Package {
            id: PackageId("registry+https://github.com/rust-lang/crates.io-index#my-crate@0.1.0".into()),
            name: "my-crate".into(),
            version: Version::new(0, 1, 0),
            targets,
        }
    }

    fn target(kind: &[&str], name: &str) -> Target {
        Target {
            kind: kind.iter().map(|k| k.to_string()).collect(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(artifact_file_name("serde"), "serde.wasm");
        assert_eq!(artifact_file_name("watt-demo"), "watt_demo.wasm");
        assert_eq!(artifact_file_name("my-proc-macro-impl"), "my_proc_macro_impl.wasm");
        assert_eq!(artifact_file_name("my_crate"), "my_crate.wasm");
    }

    #[test]
    fn test_lib_target() {
        let pkg = package(vec![
            target(&["bin"], "my-crate"),
            target(&["rlib", "cdylib"], "my_crate"),
        ]);

        assert_eq!(lib_target(&pkg).unwrap().name, "my_crate");
    }

    #[test]
    fn test_lib_target_missing_names_package() {
        let pkg = package(vec![target(&["lib"], "my_crate")]);

        let err = lib_target(&pkg).unwrap_err();
        assert!(matches!(err, WattbuildError::MissingLibTarget { .. }));
        assert!(err.to_string().contains("my-crate@0.1.0"));
    }
}
