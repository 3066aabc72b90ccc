// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the osubot filter pipeline.

use thiserror::Error;

/// The primary error type used across the filter pipeline crates.
#[derive(Debug, Error)]
pub enum OsuBotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A minifilter manifest could not be parsed or is incomplete.
    #[error("invalid manifest {path}: {message}")]
    Manifest { path: String, message: String },

    /// A minifilter name was registered twice.
    #[error("minifilter `{name}` is already registered")]
    DuplicateFilter { name: String },

    /// The processor for a minifilter could not be resolved.
    #[error("failed to load processor for `{name}`: {message}")]
    ProcessorLoad { name: String, message: String },

    /// A processor failed while transforming a record.
    #[error("minifilter `{filter}` failed: {message}")]
    Transform {
        filter: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem errors while scanning the plugin root.
    #[error("i/o error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OsuBotError {
    /// Shorthand for a `Transform` error without an underlying source.
    pub fn transform(filter: impl Into<String>, message: impl Into<String>) -> Self {
        OsuBotError::Transform {
            filter: filter.into(),
            message: message.into(),
            source: None,
        }
    }
}
