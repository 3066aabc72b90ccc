// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The filter manager: built once, then applied many times.
//!
//! Build runs register → sort → load → compile. After `build()` returns, the
//! manager is immutable and can be shared freely across tasks.

use std::collections::HashMap;
use std::path::PathBuf;

use osubot_config::FiltersConfig;
use osubot_core::{DataRecord, HookState, OsuBotError};

use crate::chain::{compile_chain, ExecutionChain};
use crate::discovery::register_root;
use crate::engine::ApplyOutcome;
use crate::graph::{DependencyGraph, SortOutcome};
use crate::manifest::{FilterManifest, MANIFEST_FILENAME};
use crate::processor::{load_processors, ProcessorCatalog, ProcessorFactory};
use crate::registry::{FilterRegistry, ManifestSource};

/// Build result for one hook.
#[derive(Debug, Clone)]
pub struct CompiledHook {
    state: HookState,
    sorted: Vec<String>,
    chain: ExecutionChain,
}

impl CompiledHook {
    pub fn state(&self) -> HookState {
        self.state
    }

    /// Sorted member names; empty when the hook is disabled.
    pub fn sorted(&self) -> &[String] {
        &self.sorted
    }

    pub fn chain(&self) -> &ExecutionChain {
        &self.chain
    }
}

/// Compiled minifilter chains for every hook.
#[derive(Debug)]
pub struct FilterManager {
    registry: FilterRegistry,
    compiled: HashMap<String, CompiledHook>,
}

impl FilterManager {
    pub fn builder() -> FilterManagerBuilder {
        FilterManagerBuilder::new()
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Hook names in first-registration order.
    pub fn hooks(&self) -> &[String] {
        self.registry.hooks()
    }

    /// Build state of `hook`. Hooks nobody registered are `Empty`.
    pub fn hook_state(&self, hook: &str) -> HookState {
        self.compiled
            .get(hook)
            .map(|c| c.state)
            .unwrap_or(HookState::Empty)
    }

    /// Sorted minifilter names of `hook`.
    pub fn chain(&self, hook: &str) -> &[String] {
        self.compiled
            .get(hook)
            .map(|c| c.sorted.as_slice())
            .unwrap_or(&[])
    }

    pub fn compiled_chain(&self, hook: &str) -> Option<&ExecutionChain> {
        self.compiled.get(hook).map(|c| &c.chain)
    }

    pub fn compiled_hook(&self, hook: &str) -> Option<&CompiledHook> {
        self.compiled.get(hook)
    }

    fn active_chain(&self, hook: &str) -> Option<&ExecutionChain> {
        self.compiled
            .get(hook)
            .filter(|c| c.state.is_active())
            .map(|c| &c.chain)
    }

    /// Run `hook` synchronously and report failed steps.
    pub fn run(&self, hook: &str, record: &DataRecord) -> ApplyOutcome {
        match self.active_chain(hook) {
            Some(chain) => chain.run(record),
            None => ApplyOutcome::start(record.clone()),
        }
    }

    /// Run `hook`, awaiting async steps one at a time.
    pub async fn run_async(&self, hook: &str, record: &DataRecord) -> ApplyOutcome {
        match self.active_chain(hook) {
            Some(chain) => chain.run_async(record).await,
            None => ApplyOutcome::start(record.clone()),
        }
    }

    /// Apply every minifilter of `hook` to a copy of `record`.
    ///
    /// Unknown, empty, and disabled hooks return the record unchanged. Step
    /// failures are logged and never surface here.
    pub fn apply(&self, hook: &str, record: &DataRecord) -> DataRecord {
        self.run(hook, record).record
    }

    /// Async variant of [`apply`](Self::apply).
    pub async fn apply_async(&self, hook: &str, record: &DataRecord) -> DataRecord {
        self.run_async(hook, record).await.record
    }
}

/// Collects manifests, discovery roots, and processors, then builds a
/// [`FilterManager`].
pub struct FilterManagerBuilder {
    manifests: Vec<FilterManifest>,
    roots: Vec<PathBuf>,
    manifest_file: String,
    catalog: ProcessorCatalog,
}

impl Default for FilterManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterManagerBuilder {
    pub fn new() -> Self {
        Self {
            manifests: Vec::new(),
            roots: Vec::new(),
            manifest_file: MANIFEST_FILENAME.to_string(),
            catalog: ProcessorCatalog::new(),
        }
    }

    /// Start from the `[filters]` config section: its root (if any) and
    /// manifest file name.
    pub fn from_config(config: &FiltersConfig) -> Self {
        let mut builder = Self::new().manifest_file(config.manifest_file.clone());
        if let Some(root) = &config.root {
            builder = builder.root(root);
        }
        builder
    }

    /// Register a manifest statically. Static manifests are registered
    /// before any directory is scanned.
    pub fn manifest(mut self, manifest: FilterManifest) -> Self {
        self.manifests.push(manifest);
        self
    }

    pub fn manifests(mut self, manifests: impl IntoIterator<Item = FilterManifest>) -> Self {
        self.manifests.extend(manifests);
        self
    }

    /// Add a discovery root. Roots are scanned in the order added.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }

    pub fn processor(
        mut self,
        entry: impl Into<String>,
        factory: impl ProcessorFactory + 'static,
    ) -> Self {
        self.catalog.register(entry, factory);
        self
    }

    pub fn processors(mut self, catalog: ProcessorCatalog) -> Self {
        self.catalog.extend(catalog);
        self
    }

    /// Build the manager.
    ///
    /// Only a duplicate name among the static manifests fails the build.
    /// Everything else (bad manifests on disk, cycles, missing processors)
    /// is logged and degrades the affected hook or minifilter.
    pub fn build(self) -> Result<FilterManager, OsuBotError> {
        let mut registry = FilterRegistry::new();
        for manifest in self.manifests {
            registry.register(manifest, ManifestSource::Static)?;
        }
        for root in &self.roots {
            register_root(&mut registry, root, &self.manifest_file);
        }

        tracing::info!(filters = registry.len(), hooks = registry.hooks().len(), "building minifilter chains");

        let sorted: Vec<(String, SortOutcome)> = registry
            .hooks()
            .iter()
            .map(|hook| (hook.clone(), sort_hook(&registry, hook)))
            .collect();

        let processors = load_processors(&registry, &self.catalog);

        let compiled = sorted
            .into_iter()
            .map(|(hook, outcome)| {
                let compiled = match outcome {
                    SortOutcome::Sorted(names) => {
                        let chain = compile_chain(&hook, &names, &processors);
                        let state = if chain.is_empty() {
                            HookState::Empty
                        } else {
                            HookState::Ready
                        };
                        CompiledHook {
                            state,
                            sorted: names,
                            chain,
                        }
                    }
                    SortOutcome::Cycle { .. } => CompiledHook {
                        state: HookState::Disabled,
                        sorted: Vec::new(),
                        chain: ExecutionChain::empty(&hook),
                    },
                };
                tracing::info!(hook = %hook, state = %compiled.state, "hook ready");
                (hook, compiled)
            })
            .collect();

        Ok(FilterManager { registry, compiled })
    }
}

fn sort_hook(registry: &FilterRegistry, hook: &str) -> SortOutcome {
    let members = registry.members(hook);
    let graph = DependencyGraph::build(members, |name| {
        registry
            .get(name)
            .map(|e| e.manifest.depends.as_slice())
            .unwrap_or(&[])
    });

    let outcome = graph.sort();
    match &outcome {
        SortOutcome::Sorted(order) => {
            tracing::info!(hook, order = %order.join(" -> "), "chain order resolved");
        }
        SortOutcome::Cycle { unresolved } => {
            tracing::error!(
                hook,
                ?unresolved,
                disabled = ?members,
                "dependency cycle detected, disabling every minifilter on this hook"
            );
        }
    }
    outcome
}
