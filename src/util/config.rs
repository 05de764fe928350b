//! Invocation configuration.
//!
//! Everything a build needs from the outside world is gathered into a
//! [`Config`] once, at the boundary (the CLI or [`Config::from_env`]).
//! The build itself never reads the process environment.
//!
//! Default working directory:
//!
//! | Platform | Directory                                              |
//! | :-       | :-                                                     |
//! | Linux    | `$XDG_CACHE_DIR/wattbuild` or `$HOME/.cache/wattbuild` |
//! | macOS    | `$HOME/Library/Caches/wattbuild`                       |
//! | Windows  | `%LOCALAPPDATA%\wattbuild`                             |

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::util::errors::WattbuildError;

/// Name of the working directory under the cache directory.
pub const WORKDIR_NAME: &str = "wattbuild";

/// Where the synthesized package lives while it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScratchDir {
    /// A directory reused across invocations, so cargo's lockfile and
    /// target directory survive between builds. No locking is done.
    Persistent(PathBuf),

    /// A fresh temporary directory removed when the build ends.
    Temporary,
}

/// How compiled artifacts are picked up after the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectPolicy {
    /// Copy exactly one `cdylib` artifact per root dependency.
    #[default]
    Precise,

    /// Copy every `.wasm` file in the release output directory.
    Broad,
}

impl FromStr for CollectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "precise" => Ok(CollectPolicy::Precise),
            "broad" => Ok(CollectPolicy::Broad),
            _ => Err(format!(
                "invalid collect policy '{}'; expected 'precise' or 'broad'",
                s
            )),
        }
    }
}

impl fmt::Display for CollectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectPolicy::Precise => write!(f, "precise"),
            CollectPolicy::Broad => write!(f, "broad"),
        }
    }
}

/// Configuration for one wattbuild invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to cargo as handed to us (usually `$CARGO`). Looked up on PATH when `None`.
    pub cargo: Option<PathBuf>,

    /// Destination directory for `.wasm` artifacts (usually `$OUT_DIR`).
    pub out_dir: PathBuf,

    /// Working directory policy.
    pub scratch: ScratchDir,

    /// Explicit rustup toolchain name.
    pub toolchain: Option<String>,

    /// Revision of the Watt repository that `proc-macro2` is patched to.
    pub proc_macro2_rev: Option<String>,

    /// Use `sccache` as `RUSTC_WRAPPER` when it is installed.
    pub use_sccache: bool,

    /// Artifact collection policy.
    pub collect: CollectPolicy,
}

impl Config {
    /// Create a configuration with defaults for everything but the two directories.
    pub fn new(out_dir: impl Into<PathBuf>, scratch: ScratchDir) -> Self {
        Config {
            cargo: None,
            out_dir: out_dir.into(),
            scratch,
            toolchain: None,
            proc_macro2_rev: None,
            use_sccache: false,
            collect: CollectPolicy::default(),
        }
    }

    /// Read the configuration a build script runs under.
    ///
    /// `OUT_DIR` is required. `CARGO` is optional.
    pub fn from_env() -> Result<Self, WattbuildError> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Like [`Config::from_env`], with variables read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WattbuildError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let out_dir = non_empty(&lookup, "OUT_DIR")
            .map(PathBuf::from)
            .ok_or(WattbuildError::MissingEnv { name: "OUT_DIR" })?;
        let scratch = ScratchDir::Persistent(default_workdir(&lookup)?);

        Ok(Config::new(out_dir, scratch).with_cargo(non_empty(&lookup, "CARGO").map(PathBuf::from)))
    }

    /// Set the cargo path.
    pub fn with_cargo(mut self, cargo: Option<PathBuf>) -> Self {
        self.cargo = cargo;
        self
    }

    /// Set the rustup toolchain.
    pub fn with_toolchain(mut self, toolchain: Option<impl Into<String>>) -> Self {
        self.toolchain = toolchain.map(Into::into);
        self
    }

    /// Pin the `proc-macro2` patch to a revision.
    pub fn with_proc_macro2_rev(mut self, rev: Option<impl Into<String>>) -> Self {
        self.proc_macro2_rev = rev.map(Into::into);
        self
    }

    /// Prefer `sccache` when present.
    pub fn with_sccache(mut self, use_sccache: bool) -> Self {
        self.use_sccache = use_sccache;
        self
    }

    /// Set the collection policy.
    pub fn with_collect(mut self, collect: CollectPolicy) -> Self {
        self.collect = collect;
        self
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<OsString>
where
    F: Fn(&str) -> Option<OsString>,
{
    lookup(name).filter(|v| !v.is_empty())
}

/// The user cache directory.
///
/// Outside Windows and macOS a non-empty `$XDG_CACHE_DIR` wins, otherwise
/// the platform default.
pub fn cache_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    if cfg!(not(any(windows, target_os = "macos"))) {
        if let Some(dir) = non_empty(lookup, "XDG_CACHE_DIR") {
            return Some(PathBuf::from(dir));
        }
    }
    directories::BaseDirs::new().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// The persistent working directory, `<cache dir>/wattbuild`.
pub fn default_workdir<F>(lookup: &F) -> Result<PathBuf, WattbuildError>
where
    F: Fn(&str) -> Option<OsString>,
{
    cache_dir(lookup)
        .map(|dir| dir.join(WORKDIR_NAME))
        .ok_or(WattbuildError::NoCacheDir)
}
