// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processor loading.
//!
//! Minifilters are compiled into the binary. A `ProcessorCatalog` maps each
//! entry-point name to a factory; loading a minifilter means looking up its
//! manifest's entry point and asking the factory for a processor handle.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use osubot_core::{OsuBotError, ProcessorHandle};

use crate::manifest::FilterManifest;
use crate::registry::FilterRegistry;

/// Creates the processor for a minifilter from its manifest.
pub trait ProcessorFactory: Send + Sync {
    fn create(&self, manifest: &FilterManifest) -> Result<ProcessorHandle, OsuBotError>;
}

/// A ready-made handle is its own factory.
impl ProcessorFactory for ProcessorHandle {
    fn create(&self, _manifest: &FilterManifest) -> Result<ProcessorHandle, OsuBotError> {
        Ok(self.clone())
    }
}

/// Adapts a closure into a [`ProcessorFactory`].
pub struct FnFactory<F>(pub F);

impl<F> ProcessorFactory for FnFactory<F>
where
    F: Fn(&FilterManifest) -> Result<ProcessorHandle, OsuBotError> + Send + Sync,
{
    fn create(&self, manifest: &FilterManifest) -> Result<ProcessorHandle, OsuBotError> {
        (self.0)(manifest)
    }
}

/// Static table of processor factories keyed by entry-point name.
#[derive(Default)]
pub struct ProcessorCatalog {
    factories: HashMap<String, Box<dyn ProcessorFactory>>,
}

impl std::fmt::Debug for ProcessorCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<&String> = self.factories.keys().collect();
        entries.sort();
        f.debug_struct("ProcessorCatalog")
            .field("entries", &entries)
            .finish()
    }
}

impl ProcessorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `entry`, replacing any previous one.
    ///
    /// Returns true if an earlier factory was replaced.
    pub fn register(
        &mut self,
        entry: impl Into<String>,
        factory: impl ProcessorFactory + 'static,
    ) -> bool {
        self.factories
            .insert(entry.into(), Box::new(factory))
            .is_some()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, entry: impl Into<String>, factory: impl ProcessorFactory + 'static) -> Self {
        self.register(entry, factory);
        self
    }

    /// Merge every factory from `other` into this catalog.
    pub fn extend(&mut self, other: ProcessorCatalog) {
        self.factories.extend(other.factories);
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.factories.contains_key(entry)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolve the processor for `manifest`.
    ///
    /// Fails if the entry point is unknown, the factory returns an error, or
    /// the factory panics.
    pub fn resolve(&self, manifest: &FilterManifest) -> Result<ProcessorHandle, OsuBotError> {
        let entry = manifest.entry_point();
        let factory = self
            .factories
            .get(entry)
            .ok_or_else(|| OsuBotError::ProcessorLoad {
                name: manifest.name.clone(),
                message: format!("no processor registered for entry `{entry}`"),
            })?;

        match std::panic::catch_unwind(AssertUnwindSafe(|| factory.create(manifest))) {
            Ok(Ok(handle)) => Ok(handle),
            Ok(Err(e)) => Err(OsuBotError::ProcessorLoad {
                name: manifest.name.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(OsuBotError::ProcessorLoad {
                name: manifest.name.clone(),
                message: "processor factory panicked".to_string(),
            }),
        }
    }
}

/// Load the processor of every registered minifilter.
///
/// Failures are logged and leave that minifilter out of the result; they
/// never affect other minifilters.
pub fn load_processors(
    registry: &FilterRegistry,
    catalog: &ProcessorCatalog,
) -> HashMap<String, ProcessorHandle> {
    tracing::info!(count = registry.len(), "loading minifilter processors");

    let mut loaded = HashMap::new();
    for entry in registry.entries() {
        let name = &entry.manifest.name;
        match catalog.resolve(&entry.manifest) {
            Ok(handle) => {
                tracing::debug!(filter = %name, is_async = handle.is_async(), "processor loaded");
                loaded.insert(name.clone(), handle);
            }
            Err(e) => {
                tracing::error!(filter = %name, source = %entry.source, error = %e, "failed to load processor");
            }
        }
    }
    loaded
}
