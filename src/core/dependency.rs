//! Build dependency specifications.
//!
//! A build dependency is handed to us as the right-hand side of a
//! `[build-dependencies]` entry. The key is generated by the manifest
//! synthesizer, so the value has to name its package with a `package` key.
//!
//! Two conveniences are layered on top of the raw string:
//! - [`Dependency`] renders a typed description into such a value.
//! - A full declaration line such as `serde = "1"` is rewritten into
//!   `{ package = "serde", version = "1" }`.

use std::fmt;

use toml_edit::{DocumentMut, InlineTable, Value};

/// Where a typed [`Dependency`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// A version requirement on crates.io.
    Registry { version: &'a str },

    /// A git repository, optionally at a revision.
    Git { git: &'a str, rev: Option<&'a str> },

    /// A local path.
    Path { path: &'a str },
}

/// A typed build dependency.
///
/// ```
/// use wattbuild::{Dependency, Source};
///
/// let dep = Dependency {
///     package: "watt-demo",
///     source: Source::Git {
///         git: "https://github.com/dtolnay/watt",
///         rev: None,
///     },
/// };
/// assert!(dep.to_spec().contains(r#"package = "watt-demo""#));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency<'a> {
    pub package: &'a str,
    pub source: Source<'a>,
}

impl Dependency<'_> {
    /// Render as the right-hand side of a dependency declaration.
    pub fn to_spec(&self) -> String {
        let mut table = InlineTable::new();
        table.insert("package", Value::from(self.package));

        match self.source {
            Source::Registry { version } => {
                table.insert("version", Value::from(version));
            }
            Source::Git { git, rev } => {
                table.insert("git", Value::from(git));
                if let Some(rev) = rev {
                    table.insert("rev", Value::from(rev));
                }
            }
            Source::Path { path } => {
                table.insert("path", Value::from(path));
            }
        }

        render_inline(table)
    }
}

/// One build dependency specification, ready to be placed after `_N = `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDependency(String);

impl BuildDependency {
    /// Create a specification from user input.
    ///
    /// Never fails. A `name = value` line whose value is a version string
    /// or an inline table is rewritten to carry `package = "name"`;
    /// anything else is kept verbatim and left for cargo to judge.
    pub fn new(spec: impl Into<String>) -> Self {
        let spec = spec.into();
        match normalize_declaration(&spec) {
            Some(normalized) => {
                tracing::debug!("Rewrote `{}` as `{}`", spec, normalized);
                BuildDependency(normalized)
            }
            None => BuildDependency(spec),
        }
    }

    /// The specification text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BuildDependency {
    fn from(spec: &str) -> Self {
        BuildDependency::new(spec)
    }
}

impl From<String> for BuildDependency {
    fn from(spec: String) -> Self {
        BuildDependency::new(spec)
    }
}

impl From<&Dependency<'_>> for BuildDependency {
    fn from(dep: &Dependency<'_>) -> Self {
        BuildDependency(dep.to_spec())
    }
}

impl fmt::Display for BuildDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_declaration(spec: &str) -> Option<String> {
    let doc = spec.parse::<DocumentMut>().ok()?;
    let mut entries = doc.as_table().iter();
    let (name, item) = entries.next()?;
    if entries.next().is_some() {
        return None;
    }

    let table = match item.as_value()? {
        Value::String(version) => {
            let mut table = InlineTable::new();
            table.insert("package", Value::from(name));
            table.insert("version", Value::from(version.value().as_str()));
            table
        }
        Value::InlineTable(table) => {
            let mut table = table.clone();
            if !table.contains_key("package") {
                table.insert("package", Value::from(name));
            }
            table
        }
        _ => return None,
    };

    Some(render_inline(table))
}

fn render_inline(mut table: InlineTable) -> String {
    table.fmt();
    table.decor_mut().clear();
    table.to_string().trim().to_string()
}
