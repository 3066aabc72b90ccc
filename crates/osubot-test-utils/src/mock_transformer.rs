// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted transformers for deterministic pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use osubot_core::{AsyncDataTransformer, DataRecord, DataTransformer, OsuBotError, ProcessorHandle};
use serde_json::{json, Value};

/// What a mock does when invoked.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Append the mock's name to the `trail` array.
    Trail,
    /// Set `key` to `value`.
    Set { key: String, value: Value },
    /// Return a transform error.
    Fail,
    /// Panic.
    Panic,
}

/// A synchronous mock minifilter.
#[derive(Debug, Clone)]
pub struct MockTransformer {
    name: String,
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
}

impl MockTransformer {
    pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Appends its name to `trail`, so tests can read back execution order.
    pub fn trail(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Trail)
    }

    pub fn setting(name: impl Into<String>, key: impl Into<String>, value: Value) -> Self {
        Self::new(
            name,
            MockBehavior::Set {
                key: key.into(),
                value,
            },
        )
    }

    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Fail)
    }

    pub fn panicking(name: impl Into<String>) -> Self {
        Self::new(name, MockBehavior::Panic)
    }

    /// Shared counter of invocations, usable after the mock is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Wrap as a synchronous processor handle.
    pub fn handle(self) -> ProcessorHandle {
        ProcessorHandle::sync(self)
    }

    fn apply(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = record.clone();
        match &self.behavior {
            MockBehavior::Trail => {
                let trail = out.entry("trail").or_insert_with(|| json!([]));
                match trail.as_array_mut() {
                    Some(items) => items.push(json!(self.name)),
                    None => return Err(OsuBotError::transform(&self.name, "trail is not an array")),
                }
            }
            MockBehavior::Set { key, value } => {
                out.insert(key.clone(), value.clone());
            }
            MockBehavior::Fail => {
                return Err(OsuBotError::transform(&self.name, "scripted failure"));
            }
            MockBehavior::Panic => panic!("scripted panic in {}", self.name),
        }
        Ok(out)
    }
}

impl DataTransformer for MockTransformer {
    fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        self.apply(record)
    }
}

/// An async mock that sleeps before behaving like its inner mock.
#[derive(Debug, Clone)]
pub struct MockAsyncTransformer {
    inner: MockTransformer,
    delay: Duration,
}

impl MockAsyncTransformer {
    pub fn new(inner: MockTransformer, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.inner.calls()
    }

    /// Wrap as an asynchronous processor handle.
    pub fn handle(self) -> ProcessorHandle {
        ProcessorHandle::asynchronous(self)
    }
}

#[async_trait]
impl AsyncDataTransformer for MockAsyncTransformer {
    async fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        tokio::time::sleep(self.delay).await;
        self.inner.apply(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_appends_name_and_counts() {
        let mock = MockTransformer::trail("a");
        let calls = mock.calls();
        let once = mock.process(&DataRecord::new()).unwrap();
        let twice = mock.process(&once).unwrap();
        assert_eq!(twice["trail"], json!(["a", "a"]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failing_mock_errors() {
        assert!(MockTransformer::failing("f").process(&DataRecord::new()).is_err());
    }

    #[tokio::test]
    async fn async_mock_delegates() {
        let mock = MockAsyncTransformer::new(
            MockTransformer::setting("s", "k", json!(1)),
            Duration::from_millis(1),
        );
        let out = AsyncDataTransformer::process(&mock, &DataRecord::new()).await.unwrap();
        assert_eq!(out["k"], json!(1));
        assert_eq!(mock.calls().load(Ordering::SeqCst), 1);
    }
}
