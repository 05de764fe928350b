//! wattbuild CLI - compile build dependencies to WebAssembly for Watt

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to cargo when we run under a build script
    let filter = if cli.verbose {
        EnvFilter::new("wattbuild=debug")
    } else {
        EnvFilter::new("wattbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    commands::build::execute(cli)
}
