// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minifilter manager.
//!
//! Minifilters are small record transformations attached to named hooks.
//! At startup the manager discovers manifests, orders each hook's members by
//! their declared dependencies, loads processors, and compiles one frozen
//! chain per hook. `apply` then runs a chain over a record, isolating
//! failures of individual steps.
//!
//! ```
//! use osubot_core::{DataRecord, ProcessorHandle};
//! use osubot_filter::{FilterManager, FilterManifest};
//!
//! let manager = FilterManager::builder()
//!     .manifest(FilterManifest::new("hello").with_hooks(["greet"]))
//!     .processor("hello", ProcessorHandle::from_fn(|r| {
//!         let mut out = r.clone();
//!         out.insert("greeting".into(), "hi".into());
//!         Ok(out)
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let out = manager.apply("greet", &DataRecord::new());
//! assert_eq!(out["greeting"], "hi");
//! ```

pub mod chain;
pub mod discovery;
pub mod engine;
pub mod global;
pub mod graph;
pub mod manager;
pub mod manifest;
pub mod processor;
pub mod registry;

pub use chain::{compile_chain, ChainStep, ExecutionChain};
pub use discovery::{register_root, scan_root, DiscoveredFilter};
pub use engine::{ApplyOutcome, StepError, StepFailure};
pub use graph::{topological_sort, DependencyGraph, SortOutcome};
pub use manager::{CompiledHook, FilterManager, FilterManagerBuilder};
pub use manifest::{parse_manifest, FilterManifest, MANIFEST_FILENAME};
pub use processor::{load_processors, FnFactory, ProcessorCatalog, ProcessorFactory};
pub use registry::{FilterEntry, FilterRegistry, ManifestSource};
