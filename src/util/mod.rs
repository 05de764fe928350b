//! Shared utilities

pub mod config;
pub mod errors;
pub mod fs;
pub mod process;
pub mod workdir;

pub use config::Config;
pub use errors::WattbuildError;
pub use workdir::Workdir;
