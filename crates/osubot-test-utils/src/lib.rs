// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for osubot integration tests.
//!
//! - [`MockTransformer`] - scripted synchronous minifilter with a call counter
//! - [`MockAsyncTransformer`] - the same behind an await point
//! - [`record`] - build a `DataRecord` from a `json!` object

pub mod mock_transformer;

pub use mock_transformer::{MockAsyncTransformer, MockBehavior, MockTransformer};

use osubot_core::DataRecord;

/// Convert a JSON object literal into a `DataRecord`.
///
/// Panics if `value` is not an object.
pub fn record(value: serde_json::Value) -> DataRecord {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("record() expects a JSON object, got {other}"),
    }
}
