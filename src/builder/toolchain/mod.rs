//! The cargo toolchain, as a black box.
//!
//! [`Cargo`] knows how to spell the three commands a build needs. Which
//! executable runs them, and with what environment, is decided by
//! [`detect_cargo`].

use std::path::{Path, PathBuf};

use crate::core::metadata::{Metadata, Package};
use crate::util::errors::WattbuildError;
use crate::util::process::ProcessBuilder;

mod detect;

pub use detect::detect_cargo;

/// A way to invoke cargo.
#[derive(Debug, Clone)]
pub struct Cargo {
    /// Executable to spawn (`cargo`, or `rustup` for an explicit toolchain).
    program: PathBuf,

    /// Arguments placed before every cargo subcommand (`run <toolchain> cargo`).
    prefix: Vec<String>,

    /// Environment overrides for every invocation.
    env: Vec<(String, String)>,
}

impl Cargo {
    /// Invoke `program` directly.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Cargo {
            program: program.into(),
            prefix: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Put `args` before every subcommand.
    fn with_prefix<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for every invocation.
    fn with_env(mut self, key: impl Into<String>, value: impl AsRef<Path>) -> Self {
        self.env
            .push((key.into(), value.as_ref().to_string_lossy().into_owned()));
        self
    }

    /// A command running in `dir` with the prefix and environment applied.
    pub fn command(&self, dir: &Path) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program).args(&self.prefix).cwd(dir);
        for (key, value) in &self.env {
            cmd = cmd.env(key, value);
        }
        cmd
    }

    /// `cargo update`: resolve and pin the synthesized package's dependencies.
    pub fn update(&self, dir: &Path) -> Result<(), WattbuildError> {
        self.command(dir).arg("update").exec_and_check()?;
        Ok(())
    }

    /// `cargo metadata --format-version 1`, parsed.
    pub fn metadata(&self, dir: &Path) -> Result<Metadata, WattbuildError> {
        let output = self
            .command(dir)
            .args(["metadata", "--format-version", "1"])
            .exec_and_check()?;
        Ok(Metadata::parse(&output.stdout)?)
    }

    /// `cargo build --release` for exactly `packages`, targeting `triple`.
    pub fn build_release(
        &self,
        dir: &Path,
        packages: &[&Package],
        triple: &str,
    ) -> Result<(), WattbuildError> {
        self.command(dir)
            .args(build_args(packages, triple))
            .exec_and_check()?;
        Ok(())
    }
}

/// Arguments of the release build: one `-p name:version` per package.
fn build_args(packages: &[&Package], triple: &str) -> Vec<String> {
    let mut args = vec!["build".to_string(), "--release".to_string()];
    for package in packages {
        args.push("-p".to_string());
        args.push(package.spec());
    }
    args.push("--target".to_string());
    args.push(triple.to_string());
    args
}
