//! `cargo metadata --format-version 1` output.
//!
//! Only the fields wattbuild reads are modeled. They are required: a
//! missing field fails deserialization instead of surfacing later as a
//! lookup failure.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;
use thiserror::Error;

/// Opaque cargo package id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct PackageId(pub String);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The parts of the metadata document we depend on.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Every package in the dependency closure.
    pub packages: Vec<Package>,

    /// Resolved graph. `null` when cargo ran with `--no-deps`.
    pub resolve: Option<Resolve>,

    /// Cargo's target directory for the synthesized package.
    pub target_directory: PathBuf,
}

/// A package in the closure.
#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub version: Version,
    pub targets: Vec<Target>,
}

/// A compilation target of a package.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub kind: Vec<String>,
    pub name: String,
}

/// The resolved graph.
#[derive(Debug, Clone, Deserialize)]
pub struct Resolve {
    /// Root package. `null` for a virtual workspace.
    pub root: Option<PackageId>,
    pub nodes: Vec<Node>,
}

/// A node of the resolved graph.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: PackageId,
    pub dependencies: Vec<PackageId>,
}

/// `cargo metadata` output that does not have the expected shape.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("could not parse `cargo metadata` output")]
    Parse(#[from] serde_json::Error),

    #[error("metadata has no `resolve` graph")]
    MissingResolve,

    #[error("metadata has no root package")]
    MissingRoot,

    #[error("root package `{0}` has no node in the resolve graph")]
    RootNodeNotFound(PackageId),

    #[error("root package `{0}` has more than one node in the resolve graph")]
    DuplicateRootNode(PackageId),

    #[error("root package `{0}` has no dependencies")]
    NoDependencies(PackageId),

    #[error("dependency `{0}` of the root package is not in the package list")]
    UnknownDependency(PackageId),
}

impl Metadata {
    /// Parse the JSON printed by `cargo metadata --format-version 1`.
    pub fn parse(json: &[u8]) -> Result<Self, MetadataError> {
        Ok(serde_json::from_slice(json)?)
    }

    /// The direct dependencies of the root package, in package-list order.
    pub fn root_dependencies(&self) -> Result<Vec<&Package>, MetadataError> {
        let resolve = self.resolve.as_ref().ok_or(MetadataError::MissingResolve)?;
        let root = resolve.root.as_ref().ok_or(MetadataError::MissingRoot)?;

        let mut nodes = resolve.nodes.iter().filter(|node| &node.id == root);
        let node = nodes
            .next()
            .ok_or_else(|| MetadataError::RootNodeNotFound(root.clone()))?;
        if nodes.next().is_some() {
            return Err(MetadataError::DuplicateRootNode(root.clone()));
        }

        if node.dependencies.is_empty() {
            return Err(MetadataError::NoDependencies(root.clone()));
        }

        let known: HashSet<&PackageId> = self.packages.iter().map(|p| &p.id).collect();
        if let Some(missing) = node.dependencies.iter().find(|id| !known.contains(id)) {
            return Err(MetadataError::UnknownDependency(missing.clone()));
        }

        let wanted: HashSet<&PackageId> = node.dependencies.iter().collect();
        Ok(self
            .packages
            .iter()
            .filter(|p| wanted.contains(&p.id))
            .collect())
    }

    /// Release output directory for a target triple.
    pub fn release_dir(&self, triple: &str) -> PathBuf {
        release_dir(&self.target_directory, triple)
    }
}

/// `<target dir>/<triple>/release`.
pub fn release_dir(target_directory: &Path, triple: &str) -> PathBuf {
    target_directory.join(triple).join("release")
}

impl Package {
    /// Package spec accepted by `cargo build -p`.
    pub fn spec(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}
