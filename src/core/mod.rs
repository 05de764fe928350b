//! Core data structures for wattbuild.
//!
//! - Build dependency specifications
//! - The synthesized manifest
//! - `cargo metadata` schema and root dependency lookup
//! - Artifact naming

pub mod artifact;
pub mod dependency;
pub mod manifest;
pub mod metadata;

pub use dependency::{BuildDependency, Dependency, Source};
pub use manifest::SynthesizedManifest;
pub use metadata::{Metadata, MetadataError, Package, PackageId};
