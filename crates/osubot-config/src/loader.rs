// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./osubot.toml` > `~/.config/osubot/osubot.toml` > `/etc/osubot/osubot.toml`
//! with environment variable overrides via the `OSUBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OsuBotConfig;

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/osubot/osubot.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "osubot.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("osubot").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/osubot/osubot.toml`
/// 3. `~/.config/osubot/osubot.toml`
/// 4. `./osubot.toml`
/// 5. `OSUBOT_*` environment variables
pub fn load_config() -> Result<OsuBotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<OsuBotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OsuBotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OsuBotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OsuBotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(OsuBotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `OSUBOT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `split("_")` since keys such as
/// `manifest_file` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("OSUBOT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("bot_", "bot.", 1)
            .replacen("filters_", "filters.", 1);
        mapped.into()
    })
}
