// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::OsuBotConfig;

/// Log levels accepted by `bot.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &OsuBotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.bot.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` is not one of: {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.filters.manifest_file.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "filters.manifest_file must not be empty".to_string(),
        });
    }

    if config
        .filters
        .root
        .as_deref()
        .is_some_and(|root| root.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "filters.root must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
