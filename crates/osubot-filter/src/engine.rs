// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution engine: runs a compiled chain over one record.
//!
//! A run is a fold over the chain. Every step sees the output of the last
//! successful step. A step that errors or panics is logged, recorded in the
//! outcome, and otherwise behaves as a no-op. Steps never run concurrently.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use osubot_core::{DataRecord, OsuBotError, ProcessorHandle};

use crate::chain::{ChainStep, ExecutionChain};

/// Why a single step produced no output.
#[derive(Debug)]
pub enum StepError {
    /// The processor returned an error.
    Failed(OsuBotError),
    /// The processor panicked; holds the panic message.
    Panicked(String),
    /// An async processor was reached from the synchronous `run`.
    RequiresAsync,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Failed(e) => write!(f, "{e}"),
            StepError::Panicked(msg) => write!(f, "panicked: {msg}"),
            StepError::RequiresAsync => write!(f, "async processor cannot run in a synchronous apply"),
        }
    }
}

/// A step that failed during one run.
#[derive(Debug)]
pub struct StepFailure {
    pub filter: String,
    pub error: StepError,
}

/// Result of running a chain: the final record plus every failed step.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub record: DataRecord,
    pub failures: Vec<StepFailure>,
}

impl ApplyOutcome {
    pub(crate) fn start(record: DataRecord) -> Self {
        Self {
            record,
            failures: Vec::new(),
        }
    }

    /// True if every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fold_step(mut self, hook: &str, step: &ChainStep, result: Result<DataRecord, StepError>) -> Self {
        match result {
            Ok(record) => self.record = record,
            Err(error) => {
                tracing::error!(hook, filter = %step.name, error = %error, "minifilter failed, keeping previous record");
                self.failures.push(StepFailure {
                    filter: step.name.clone(),
                    error,
                });
            }
        }
        self
    }
}

impl ExecutionChain {
    /// Run every synchronous step over a copy of `record`.
    pub fn run(&self, record: &DataRecord) -> ApplyOutcome {
        tracing::debug!(hook = %self.hook, steps = self.steps.len(), "applying chain");
        self.steps
            .iter()
            .fold(ApplyOutcome::start(record.clone()), |outcome, step| {
                let result = invoke(&step.processor, &outcome.record);
                outcome.fold_step(&self.hook, step, result)
            })
    }

    /// Run every step over a copy of `record`, awaiting each one before
    /// starting the next.
    pub async fn run_async(&self, record: &DataRecord) -> ApplyOutcome {
        tracing::debug!(hook = %self.hook, steps = self.steps.len(), "applying chain");
        let mut outcome = ApplyOutcome::start(record.clone());
        for step in self.steps.iter() {
            let result = invoke_async(&step.processor, &outcome.record).await;
            outcome = outcome.fold_step(&self.hook, step, result);
        }
        outcome
    }
}

fn invoke(processor: &ProcessorHandle, record: &DataRecord) -> Result<DataRecord, StepError> {
    match processor {
        ProcessorHandle::Sync(transformer) => {
            match std::panic::catch_unwind(AssertUnwindSafe(|| transformer.process(record))) {
                Ok(result) => result.map_err(StepError::Failed),
                Err(payload) => Err(StepError::Panicked(panic_message(payload.as_ref()))),
            }
        }
        ProcessorHandle::Async(_) => Err(StepError::RequiresAsync),
    }
}

async fn invoke_async(
    processor: &ProcessorHandle,
    record: &DataRecord,
) -> Result<DataRecord, StepError> {
    match processor {
        ProcessorHandle::Sync(_) => invoke(processor, record),
        ProcessorHandle::Async(transformer) => {
            match AssertUnwindSafe(transformer.process(record)).catch_unwind().await {
                Ok(result) => result.map_err(StepError::Failed),
                Err(payload) => Err(StepError::Panicked(panic_message(payload.as_ref()))),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
