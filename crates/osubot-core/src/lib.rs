// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the osubot filter pipeline.
//!
//! This crate provides the error type, the opaque `DataRecord` that flows
//! through every hook, and the transformer traits that minifilters implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OsuBotError;
pub use traits::{AsyncDataTransformer, DataTransformer, ProcessorHandle};
pub use types::{DataRecord, HookState};
