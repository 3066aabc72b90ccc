// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minifilter manifest parsing from `minifilter.toml` files.
//!
//! A manifest names a minifilter, the hooks it attaches to, and the
//! minifilters that must run before it on those hooks.

use osubot_core::OsuBotError;
use serde::{Deserialize, Serialize};

/// Default manifest file name inside a minifilter directory.
pub const MANIFEST_FILENAME: &str = "minifilter.toml";

/// Parsed minifilter manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterManifest {
    /// Unique name across the whole registry.
    pub name: String,
    /// Informational version string.
    pub version: String,
    /// Informational description.
    pub description: String,
    /// Hooks this minifilter attaches to, without duplicates.
    pub hooks: Vec<String>,
    /// Minifilters that must run earlier on shared hooks, without duplicates.
    pub depends: Vec<String>,
    /// Processor reference resolved by the processor catalog.
    /// `None` means "same as `name`".
    pub entry: Option<String>,
}

impl FilterManifest {
    /// A manifest with default version and no hooks or dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            description: String::new(),
            hooks: Vec::new(),
            depends: Vec::new(),
            entry: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_hooks<I, S>(mut self, hooks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hooks = dedup(hooks.into_iter().map(Into::into));
        self
    }

    pub fn with_depends<I, S>(mut self, depends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends = dedup(depends.into_iter().map(Into::into));
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Drops repeated hooks and dependencies, keeping first occurrences.
    pub(crate) fn normalized(mut self) -> Self {
        self.hooks = dedup(std::mem::take(&mut self.hooks).into_iter());
        self.depends = dedup(std::mem::take(&mut self.depends).into_iter());
        self
    }

    /// Case-insensitive match of `query` against the name, description, and
    /// hooks. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.hooks.iter().any(|h| h.to_lowercase().contains(&query))
    }

    /// The processor reference to resolve for this minifilter.
    pub fn entry_point(&self) -> &str {
        self.entry.as_deref().unwrap_or(&self.name)
    }
}

/// Intermediate TOML deserialization struct for `minifilter.toml`.
#[derive(Debug, Deserialize)]
struct ManifestFile {
    minifilter: MinifilterSection,
}

/// The `[minifilter]` section of a manifest file.
#[derive(Debug, Deserialize)]
struct MinifilterSection {
    name: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    hooks: Vec<String>,
    #[serde(default)]
    depends: Vec<String>,
    #[serde(default)]
    entry: Option<String>,
}

fn default_version() -> String {
    "0.0.1".to_string()
}

/// Keeps the first occurrence of every value.
fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Parse a minifilter manifest from TOML content.
///
/// `origin` names the file in error messages. Only `name` is required and it
/// must be non-empty. A version that is not semver is accepted with a warning.
pub fn parse_manifest(toml_content: &str, origin: &str) -> Result<FilterManifest, OsuBotError> {
    let file: ManifestFile = toml::from_str(toml_content).map_err(|e| OsuBotError::Manifest {
        path: origin.to_string(),
        message: e.message().to_string(),
    })?;

    let section = file.minifilter;

    if section.name.trim().is_empty() {
        return Err(OsuBotError::Manifest {
            path: origin.to_string(),
            message: "name must not be empty".to_string(),
        });
    }

    if semver::Version::parse(&section.version).is_err() {
        tracing::warn!(
            filter = %section.name,
            version = %section.version,
            "minifilter version is not valid semver"
        );
    }

    Ok(FilterManifest {
        name: section.name,
        version: section.version,
        description: section.description,
        hooks: dedup(section.hooks.into_iter()),
        depends: dedup(section.depends.into_iter()),
        entry: section.entry.filter(|e| !e.trim().is_empty()),
    })
}
