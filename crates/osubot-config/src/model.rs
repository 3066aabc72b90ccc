// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level osubot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OsuBotConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Minifilter discovery and registration.
    #[serde(default)]
    pub filters: FiltersConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "osubot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Minifilter discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    /// Directory scanned for minifilter units. `None` disables directory discovery.
    #[serde(default)]
    pub root: Option<String>,

    /// File name of the manifest inside each minifilter directory.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Register the compiled-in minifilter catalog before scanning.
    #[serde(default = "default_true")]
    pub builtin: bool,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            root: None,
            manifest_file: default_manifest_file(),
            builtin: true,
        }
    }
}

fn default_manifest_file() -> String {
    "minifilter.toml".to_string()
}

fn default_true() -> bool {
    true
}
