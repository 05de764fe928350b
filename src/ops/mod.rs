//! High-level operations.

pub mod collect;
pub mod wattbuild_build;

pub use collect::{collect_broad, collect_precise};
pub use wattbuild_build::{build, BuildResult};
