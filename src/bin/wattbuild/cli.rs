//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Compile build dependencies to WebAssembly for Watt
#[derive(Parser)]
#[command(name = "wattbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build dependency specifications, e.g. `serde = "1"` or
    /// `{ package = "watt-demo", git = "https://github.com/dtolnay/watt" }`
    #[arg(required = true, value_name = "BUILD_DEPENDENCIES")]
    pub build_dependencies: Vec<String>,

    /// Build with this rustup toolchain
    #[arg(long)]
    pub toolchain: Option<String>,

    /// Revision of the Watt repository to patch `proc-macro2` to
    #[arg(long)]
    pub proc_macro2_rev: Option<String>,

    /// Use sccache as the compiler wrapper when it is installed
    #[arg(long)]
    pub sccache: bool,

    /// Directory to copy the `.wasm` artifacts to
    #[arg(long, env = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Path to cargo
    #[arg(long, env = "CARGO", hide = true)]
    pub cargo: Option<PathBuf>,

    /// Working directory (defaults to `<cache dir>/wattbuild`)
    #[arg(long, conflicts_with = "temp_workdir")]
    pub workdir: Option<PathBuf>,

    /// Build in a temporary directory removed afterwards
    #[arg(long)]
    pub temp_workdir: bool,

    /// Artifact collection policy (precise, broad)
    #[arg(long, default_value = "precise")]
    pub collect: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
