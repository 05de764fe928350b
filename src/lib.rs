//! wattbuild - compile build dependencies to WebAssembly for Watt
//!
//! Builds crates for `wasm32-unknown-unknown` from a `build.rs` so that a
//! proc-macro crate can load them at compile time through
//! [`watt`](https://github.com/dtolnay/watt) instead of compiling them
//! natively.
//!
//! # Usage
//!
//! ```toml
//! [lib]
//! proc-macro = true
//!
//! [dependencies]
//! watt = "0.4"
//!
//! [build-dependencies]
//! wattbuild = "0.1"
//! ```
//!
//! `build.rs`:
//!
//! ```no_run
//! use wattbuild::{Dependency, Source};
//!
//! fn main() {
//!     wattbuild::build(
//!         &[Dependency {
//!             package: "watt-demo",
//!             source: Source::Git {
//!                 git: "https://github.com/dtolnay/watt",
//!                 rev: None,
//!             },
//!         }],
//!         None,
//!         None,
//!     );
//! }
//! ```
//!
//! `lib.rs`:
//!
//! ```ignore
//! static WATT_DEMO: watt::WasmMacro =
//!     watt::WasmMacro::new(include_bytes!(concat!(env!("OUT_DIR"), "/watt_demo.wasm")));
//! ```
//!
//! The crates are built in a persistent working directory under the user
//! cache directory (see [`util::config`]).

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

use std::process;

use tracing_subscriber::EnvFilter;

pub use crate::core::{BuildDependency, Dependency, Source};
pub use crate::ops::{build as run, BuildResult};
pub use crate::util::{Config, WattbuildError};

/// Compile `dependencies` for `wasm32-unknown-unknown` and copy the `.wasm`
/// artifacts to `$OUT_DIR`. Meant to be the whole body of a build script.
///
/// `proc_macro2_rev` pins the Watt revision `proc-macro2` is patched to.
/// `toolchain` selects a rustup toolchain instead of the cargo running the
/// build script.
///
/// Exits the process: 0 on success, 1 after printing the error chain.
pub fn build(
    dependencies: &[Dependency<'_>],
    proc_macro2_rev: Option<&str>,
    toolchain: Option<&str>,
) -> ! {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("wattbuild=info"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();

    let dependencies: Vec<BuildDependency> = dependencies.iter().map(BuildDependency::from).collect();

    let result = Config::from_env().map_err(anyhow::Error::from).and_then(|config| {
        let config = config
            .with_proc_macro2_rev(proc_macro2_rev)
            .with_toolchain(toolchain);
        run(&config, &dependencies)
    });

    if let Err(err) = result {
        let mut chain = err.chain();
        if let Some(err) = chain.next() {
            eprintln!("Error: {}", err);
            for cause in chain {
                eprintln!("Caused by: {}", cause);
            }
        }
        process::exit(1);
    }
    process::exit(0);
}
