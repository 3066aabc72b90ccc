// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of minifilter manifests and hook membership.
//!
//! Manifests are keyed by name. Each hook keeps its members in registration
//! order, which is the tie-break order used by the topological sort.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use osubot_core::OsuBotError;

use crate::manifest::FilterManifest;

/// Where a manifest came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Registered from a static list compiled into the binary.
    Static,
    /// Discovered in a minifilter directory.
    Directory(PathBuf),
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Static => write!(f, "static"),
            ManifestSource::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// A single entry in the registry.
#[derive(Debug, Clone)]
pub struct FilterEntry {
    pub manifest: FilterManifest,
    pub source: ManifestSource,
}

/// Registry of minifilter manifests.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    entries: HashMap<String, FilterEntry>,
    /// Names in registration order.
    order: Vec<String>,
    /// Hook names in first-seen order.
    hook_order: Vec<String>,
    hooks: HashMap<String, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manifest and append its name to each of its hooks.
    /// A hook listed twice in the manifest still gets one membership.
    ///
    /// Fails with `DuplicateFilter` if the name is already taken; the
    /// registry is left unchanged in that case.
    pub fn register(
        &mut self,
        manifest: FilterManifest,
        source: ManifestSource,
    ) -> Result<(), OsuBotError> {
        if self.entries.contains_key(&manifest.name) {
            return Err(OsuBotError::DuplicateFilter {
                name: manifest.name,
            });
        }

        let manifest = manifest.normalized();
        for hook in &manifest.hooks {
            if !self.hooks.contains_key(hook) {
                self.hook_order.push(hook.clone());
            }
            self.hooks
                .entry(hook.clone())
                .or_default()
                .push(manifest.name.clone());
        }

        self.order.push(manifest.name.clone());
        self.entries
            .insert(manifest.name.clone(), FilterEntry { manifest, source });
        Ok(())
    }

    /// Get an entry by minifilter name.
    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.entries.get(name)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &FilterEntry> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    /// Hook names in the order they were first seen.
    pub fn hooks(&self) -> &[String] {
        &self.hook_order
    }

    /// Members of `hook` in registration order. Unknown hooks have none.
    pub fn members(&self, hook: &str) -> &[String] {
        self.hooks.get(hook).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the number of registered minifilters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(name: &str, hooks: &[&str]) -> FilterManifest {
        FilterManifest::new(name).with_hooks(hooks.iter().copied())
    }

    #[test]
    fn register_and_get_roundtrip() {
        let mut registry = FilterRegistry::new();
        registry
            .register(manifest("basic", &["user_card"]), ManifestSource::Static)
            .unwrap();

        let entry = registry.get("basic").unwrap();
        assert_eq!(entry.manifest.name, "basic");
        assert_eq!(entry.source, ManifestSource::Static);
    }

    #[test]
    fn hook_membership_preserves_registration_order() {
        let mut registry = FilterRegistry::new();
        registry
            .register(manifest("c", &["h"]), ManifestSource::Static)
            .unwrap();
        registry
            .register(manifest("a", &["g", "h"]), ManifestSource::Static)
            .unwrap();
        registry
            .register(manifest("b", &["h"]), ManifestSource::Static)
            .unwrap();

        assert_eq!(registry.members("h"), ["c", "a", "b"]);
        assert_eq!(registry.members("g"), ["a"]);
        assert_eq!(registry.hooks(), ["h", "g"]);
        let names: Vec<_> = registry.entries().map(|e| e.manifest.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn duplicate_name_is_rejected_without_side_effects() {
        let mut registry = FilterRegistry::new();
        registry
            .register(manifest("a", &["h"]), ManifestSource::Static)
            .unwrap();
        let err = registry
            .register(
                manifest("a", &["g"]),
                ManifestSource::Directory("minifilters/a".into()),
            )
            .unwrap_err();

        assert!(matches!(err, OsuBotError::DuplicateFilter { ref name } if name == "a"));
        assert_eq!(registry.len(), 1);
        assert!(registry.members("g").is_empty());
        assert_eq!(registry.get("a").unwrap().source, ManifestSource::Static);
    }

    #[test]
    fn repeated_hooks_register_once() {
        let mut m = FilterManifest::new("a");
        m.hooks = vec!["h".into(), "g".into(), "h".into()];
        m.depends = vec!["b".into(), "b".into()];

        let mut registry = FilterRegistry::new();
        registry.register(m, ManifestSource::Static).unwrap();

        assert_eq!(registry.members("h"), ["a"]);
        assert_eq!(registry.members("g"), ["a"]);
        assert_eq!(registry.hooks(), ["h", "g"]);
        let stored = &registry.get("a").unwrap().manifest;
        assert_eq!(stored.hooks, ["h", "g"]);
        assert_eq!(stored.depends, ["b"]);
    }

    #[test]
    fn unknown_hook_has_no_members() {
        let registry = FilterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.members("nope").is_empty());
    }
}
