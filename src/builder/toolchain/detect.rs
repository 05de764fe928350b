//! Toolchain detection functions.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::util::config::Config;
use crate::util::errors::WattbuildError;
use crate::util::process::{find_executable, ProcessBuilder};

use super::Cargo;

/// Detect how to invoke cargo for `config`.
///
/// Priority:
/// 1. An explicit rustup toolchain (`rustup run <toolchain> cargo`)
/// 2. The configured cargo path, corrected to a `cargo` executable
/// 3. `cargo` on PATH
///
/// `RUSTC_WRAPPER` is set to `sccache` when requested and installed.
pub fn detect_cargo(config: &Config) -> Result<Cargo, WattbuildError> {
    let mut cargo = match &config.toolchain {
        Some(toolchain) => rustup_cargo(toolchain)?,
        None => {
            let path = resolve_cargo_path(config.cargo.as_deref())?;
            Cargo::new(&path).with_env("CARGO", &path)
        }
    };

    if config.use_sccache {
        match compiler_wrapper() {
            Some(wrapper) => {
                tracing::debug!("Using compiler wrapper: {}", wrapper.display());
                cargo = cargo.with_env("RUSTC_WRAPPER", wrapper);
            }
            None => tracing::debug!("sccache not found, compiling directly"),
        }
    }

    Ok(cargo)
}

/// Run cargo through `rustup run <toolchain>`.
///
/// `CARGO` is pointed at the toolchain's own cargo so nested cargo
/// invocations (build scripts of the built crates) agree with it.
fn rustup_cargo(toolchain: &str) -> Result<Cargo, WattbuildError> {
    let rustup = find_executable("rustup").ok_or_else(|| WattbuildError::ProgramNotFound {
        program: "rustup".to_string(),
    })?;

    let output = ProcessBuilder::new(&rustup)
        .args(["which", "cargo", "--toolchain", toolchain])
        .exec_and_check()?;
    let cargo_path = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());

    tracing::debug!(
        "Using toolchain `{}` (cargo at {})",
        toolchain,
        cargo_path.display()
    );

    Ok(Cargo::new(rustup)
        .with_prefix(["run", toolchain, "cargo"])
        .with_env("CARGO", cargo_path))
}

/// Turn the configured cargo path into a usable `cargo` executable.
///
/// `$CARGO` does not always name cargo itself (it can point at a
/// `cargo-*` subcommand binary). Then the `cargo` next to it is used, and
/// failing that the one on PATH. The PATH fallback papers over unusual
/// installations and is not a general guarantee. Both substitutions are
/// logged as warnings.
fn resolve_cargo_path(configured: Option<&Path>) -> Result<PathBuf, WattbuildError> {
    let not_found = || WattbuildError::ProgramNotFound {
        program: "cargo".to_string(),
    };

    let Some(configured) = configured else {
        return find_executable("cargo").ok_or_else(not_found);
    };

    if configured.file_stem() == Some(OsStr::new("cargo")) {
        return Ok(configured.to_path_buf());
    }

    let sibling = sibling_cargo(configured);
    let substitute = if sibling.exists() {
        sibling
    } else {
        find_executable("cargo").ok_or_else(not_found)?
    };

    tracing::warn!("`{}` → `{}`", configured.display(), substitute.display());
    Ok(substitute)
}

/// `cargo` in the same directory as `path`, keeping its extension.
fn sibling_cargo(path: &Path) -> PathBuf {
    let mut name = OsString::from("cargo");
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// The compiler-acceleration wrapper, if installed.
fn compiler_wrapper() -> Option<PathBuf> {
    find_executable("sccache")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::config::ScratchDir;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_cargo() {
        assert_eq!(
            sibling_cargo(Path::new("/opt/rust/bin/cargo-clippy")),
            Path::new("/opt/rust/bin/cargo")
        );
        assert_eq!(
            sibling_cargo(Path::new(r"C:\rust\bin\cargo-clippy.exe")).file_name(),
            Some(OsStr::new("cargo.exe"))
        );
    }

    #[test]
    fn test_configured_cargo_kept() {
        let path = Path::new("/opt/rust/bin/cargo");
        assert_eq!(resolve_cargo_path(Some(path)).unwrap(), path);
    }

    #[test]
    fn test_sibling_substituted() {
        let tmp = TempDir::new().unwrap();
        let clippy = tmp.path().join("cargo-clippy");
        let cargo = tmp.path().join("cargo");
        std::fs::write(&clippy, "").unwrap();
        std::fs::write(&cargo, "").unwrap();

        assert_eq!(resolve_cargo_path(Some(clippy.as_path())).unwrap(), cargo);
    }

    #[test]
    fn test_missing_sibling_falls_back_to_path() {
        let tmp = TempDir::new().unwrap();
        let clippy = tmp.path().join("cargo-clippy");
        std::fs::write(&clippy, "").unwrap();

        match resolve_cargo_path(Some(clippy.as_path())) {
            Ok(path) => {
                assert_eq!(Some(path), find_executable("cargo"));
            }
            Err(err) => {
                assert!(find_executable("cargo").is_none());
                assert!(matches!(err, WattbuildError::ProgramNotFound { ref program } if program == "cargo"));
            }
        }
        assert!(!sibling_cargo(&clippy).exists());
    }

    #[test]
    fn test_detect_sets_cargo_env() {
        let config = Config::new("/tmp/out", ScratchDir::Temporary)
            .with_cargo(Some(PathBuf::from("/opt/rust/bin/cargo")));

        let cmd = detect_cargo(&config)
            .unwrap()
            .command(Path::new("/tmp/work"))
            .arg("update");

        assert_eq!(cmd.display_command(), "/opt/rust/bin/cargo update");
        assert_eq!(cmd.get_env("CARGO"), Some("/opt/rust/bin/cargo"));
    }
}
