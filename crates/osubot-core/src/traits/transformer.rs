// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data transformer traits and the processor handle stored in compiled chains.
//!
//! A processor borrows the incoming record and returns a new one. It never
//! mutates its input, so the engine can fall back to the previous value when
//! a step fails.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OsuBotError;
use crate::types::DataRecord;

/// A synchronous record transformation.
pub trait DataTransformer: Send + Sync + 'static {
    /// Transforms `record` into a new record.
    fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError>;
}

/// A record transformation that needs to suspend (I/O bound work).
#[async_trait]
pub trait AsyncDataTransformer: Send + Sync + 'static {
    /// Transforms `record` into a new record.
    async fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError>;
}

/// Adapts a plain function or closure into a [`DataTransformer`].
pub struct FnTransformer<F>(pub F);

impl<F> DataTransformer for FnTransformer<F>
where
    F: Fn(&DataRecord) -> Result<DataRecord, OsuBotError> + Send + Sync + 'static,
{
    fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        (self.0)(record)
    }
}

/// Opaque, cheaply clonable reference to a loaded processor.
#[derive(Clone)]
pub enum ProcessorHandle {
    Sync(Arc<dyn DataTransformer>),
    Async(Arc<dyn AsyncDataTransformer>),
}

impl ProcessorHandle {
    /// Wraps a synchronous transformer.
    pub fn sync<T: DataTransformer>(transformer: T) -> Self {
        ProcessorHandle::Sync(Arc::new(transformer))
    }

    /// Wraps an asynchronous transformer.
    pub fn asynchronous<T: AsyncDataTransformer>(transformer: T) -> Self {
        ProcessorHandle::Async(Arc::new(transformer))
    }

    /// Wraps a closure as a synchronous transformer.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&DataRecord) -> Result<DataRecord, OsuBotError> + Send + Sync + 'static,
    {
        ProcessorHandle::sync(FnTransformer(f))
    }

    /// Returns true if this processor can only run under `apply_async`.
    pub fn is_async(&self) -> bool {
        matches!(self, ProcessorHandle::Async(_))
    }
}

impl fmt::Debug for ProcessorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorHandle::Sync(_) => f.write_str("ProcessorHandle::Sync"),
            ProcessorHandle::Async(_) => f.write_str("ProcessorHandle::Async"),
        }
    }
}
