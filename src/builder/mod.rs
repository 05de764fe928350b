//! Invoking cargo on the synthesized package.

pub mod toolchain;

pub use toolchain::{detect_cargo, Cargo};
