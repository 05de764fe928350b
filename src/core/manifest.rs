//! The synthesized `Cargo.toml`.
//!
//! The package exists only to pull the requested build dependencies into a
//! cargo graph with `proc-macro2` patched to Watt's WebAssembly shim. Its
//! own name and version never matter.

use std::path::{Path, PathBuf};

use toml_edit::Value;

use crate::core::dependency::BuildDependency;
use crate::util::errors::WattbuildError;
use crate::util::fs::write_string;

/// Package whose crates.io source is patched.
pub const PATCHED_PACKAGE: &str = "proc-macro2";

/// Git repository `proc-macro2` is patched to.
pub const PATCH_GIT_URL: &str = "https://github.com/dtolnay/watt";

/// Name of the synthesized package.
pub const PACKAGE_NAME: &str = "wattbuild-build";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// An in-memory manifest for the synthesized package.
#[derive(Debug, Clone)]
pub struct SynthesizedManifest {
    build_dependencies: Vec<BuildDependency>,
    proc_macro2_rev: Option<String>,
}

impl SynthesizedManifest {
    /// Create a manifest for the given dependencies and optional revision.
    pub fn new(build_dependencies: Vec<BuildDependency>, proc_macro2_rev: Option<String>) -> Self {
        SynthesizedManifest {
            build_dependencies,
            proc_macro2_rev,
        }
    }

    /// Key of the `index`th build dependency.
    pub fn key(index: usize) -> String {
        format!("_{index}")
    }

    /// Render the manifest text.
    pub fn render(&self) -> String {
        let rev = match &self.proc_macro2_rev {
            Some(rev) => format!(", rev = {}", Value::from(rev.as_str())),
            None => String::new(),
        };

        let mut manifest = format!(
            r#"[workspace]

[patch.crates-io]
{PATCHED_PACKAGE} = {{ git = "{PATCH_GIT_URL}"{rev} }}

[package]
name = "{PACKAGE_NAME}"
version = "0.0.0"
edition = "2018"

[build-dependencies]
"#
        );

        for (i, dep) in self.build_dependencies.iter().enumerate() {
            manifest.push_str(&format!("{} = {}\n", Self::key(i), dep));
        }

        manifest
    }

    /// Write `Cargo.toml` and an empty `src/lib.rs` into `dir`.
    ///
    /// Returns the manifest path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, WattbuildError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        write_string(&manifest_path, &self.render())?;
        write_string(&dir.join("src").join("lib.rs"), "")?;
        Ok(manifest_path)
    }
}
