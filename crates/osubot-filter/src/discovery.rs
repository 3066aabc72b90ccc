// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minifilter discovery: scans a root directory for manifest files.
//!
//! Every direct subdirectory holding a manifest is one minifilter unit.
//! Subdirectories are visited in name order so that discovery order, and with
//! it the chain tie-break order, is reproducible across restarts.

use std::path::{Path, PathBuf};

use crate::manifest::{parse_manifest, FilterManifest};
use crate::registry::{FilterRegistry, ManifestSource};

/// A minifilter found on disk, before registration.
#[derive(Debug, Clone)]
pub struct DiscoveredFilter {
    pub manifest: FilterManifest,
    pub dir: PathBuf,
}

/// Scan `root` for minifilter units.
///
/// Never fails: unreadable roots, unreadable manifests, and malformed
/// manifests are logged and skipped.
pub fn scan_root(root: &Path, manifest_file: &str) -> Vec<DiscoveredFilter> {
    tracing::info!(root = %root.display(), "scanning minifilter root");

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "cannot read minifilter root");
            return Vec::new();
        }
    };

    let mut dirs: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(dir = %path.display(), "skipping directory with a non-UTF-8 name");
                return None;
            };
            (!name.starts_with('.')).then_some((name, path))
        })
        .collect();
    dirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut found = Vec::new();
    for (dir_name, dir) in dirs {
        let manifest_path = dir.join(manifest_file);
        if !manifest_path.is_file() {
            tracing::debug!(dir = %dir.display(), "skipping directory without manifest");
            continue;
        }

        let content = match std::fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %manifest_path.display(), error = %e, "cannot read minifilter manifest");
                continue;
            }
        };

        match parse_manifest(&content, &manifest_path.display().to_string()) {
            Ok(mut manifest) => {
                if manifest.entry.is_none() {
                    manifest.entry = Some(dir_name);
                }
                found.push(DiscoveredFilter { manifest, dir });
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping minifilter with invalid manifest");
            }
        }
    }

    found
}

/// Scan `root` and register everything found.
///
/// A name already present in the registry is logged and skipped; the first
/// registration wins. Returns the number of minifilters registered.
pub fn register_root(registry: &mut FilterRegistry, root: &Path, manifest_file: &str) -> usize {
    let mut registered = 0;
    for DiscoveredFilter { manifest, dir } in scan_root(root, manifest_file) {
        let name = manifest.name.clone();
        let hooks = manifest.hooks.clone();
        let depends = manifest.depends.clone();
        match registry.register(manifest, ManifestSource::Directory(dir)) {
            Ok(()) => {
                tracing::info!(filter = %name, ?hooks, ?depends, "minifilter registered");
                registered += 1;
            }
            Err(e) => tracing::error!(filter = %name, error = %e, "skipping minifilter"),
        }
    }

    tracing::info!(root = %root.display(), registered, "minifilter scan complete");
    registered
}
