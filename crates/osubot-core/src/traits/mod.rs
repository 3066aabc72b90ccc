// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by minifilter processors.

pub mod transformer;

pub use transformer::{AsyncDataTransformer, DataTransformer, FnTransformer, ProcessorHandle};
