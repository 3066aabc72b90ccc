// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chain compilation: sorted names plus loaded processors become a frozen,
//! directly callable list per hook.

use std::collections::HashMap;
use std::sync::Arc;

use osubot_core::ProcessorHandle;

/// One compiled step: the minifilter name and its processor.
#[derive(Debug, Clone)]
pub struct ChainStep {
    pub(crate) name: String,
    pub(crate) processor: ProcessorHandle,
}

impl ChainStep {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor(&self) -> &ProcessorHandle {
        &self.processor
    }
}

/// The compiled, immutable execution chain of one hook.
///
/// Cloning is cheap and shares the steps.
#[derive(Debug, Clone)]
pub struct ExecutionChain {
    pub(crate) hook: String,
    pub(crate) steps: Arc<[ChainStep]>,
}

impl ExecutionChain {
    /// A chain that runs nothing; `apply` on it is the identity.
    pub fn empty(hook: impl Into<String>) -> Self {
        Self {
            hook: hook.into(),
            steps: Arc::from(Vec::new()),
        }
    }

    pub fn hook(&self) -> &str {
        &self.hook
    }

    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Minifilter names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Compile the chain for `hook` from its sorted member names.
///
/// Names without a loaded processor are skipped with a warning.
pub fn compile_chain(
    hook: &str,
    sorted: &[String],
    processors: &HashMap<String, ProcessorHandle>,
) -> ExecutionChain {
    let steps: Vec<ChainStep> = sorted
        .iter()
        .filter_map(|name| match processors.get(name) {
            Some(processor) => Some(ChainStep {
                name: name.clone(),
                processor: processor.clone(),
            }),
            None => {
                tracing::warn!(hook, filter = %name, "skipping minifilter without a loaded processor");
                None
            }
        })
        .collect();

    tracing::info!(hook, steps = steps.len(), "chain compiled");
    ExecutionChain {
        hook: hook.to_string(),
        steps: Arc::from(steps),
    }
}
