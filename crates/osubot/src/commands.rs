// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use osubot_config::OsuBotConfig;
use osubot_core::{DataRecord, OsuBotError};
use osubot_filter::{global, FilterManager, FilterManagerBuilder};
use osubot_minifilters::{builtin_manifests, builtin_processors, search_catalog, OfflineLookup};
use serde_json::Value;

/// Build the process-wide manager from configuration, once.
pub fn manager(config: &OsuBotConfig) -> Result<Arc<FilterManager>, OsuBotError> {
    global::get_or_init(|| builder(config).build())
}

fn builder(config: &OsuBotConfig) -> FilterManagerBuilder {
    let mut builder = FilterManagerBuilder::from_config(&config.filters);
    if config.filters.builtin {
        builder = builder.manifests(builtin_manifests());
    }
    builder.processors(builtin_processors(Arc::new(OfflineLookup)))
}

/// `osubot filters [--search <q>]`
pub fn filters(config: &OsuBotConfig, search: Option<&str>) -> Result<(), OsuBotError> {
    let manager = manager(config)?;
    let query = search.unwrap_or("");

    let mut shown = 0;
    for entry in manager
        .registry()
        .entries()
        .filter(|e| e.manifest.matches_query(query))
    {
        let m = &entry.manifest;
        println!("{} {} [{}]", m.name, m.version, entry.source);
        if !m.description.is_empty() {
            println!("    {}", m.description);
        }
        println!("    hooks: {}", join_or_dash(&m.hooks));
        println!("    depends: {}", join_or_dash(&m.depends));
        shown += 1;
    }

    if shown == 0 {
        match search {
            Some(q) => println!("No minifilters match '{q}'."),
            None => println!("No minifilters registered."),
        }
        // Point at the built-ins when they are switched off.
        if !config.filters.builtin && !search_catalog(query).is_empty() {
            println!("Built-in minifilters are disabled (filters.builtin = false).");
        }
    }
    Ok(())
}

/// `osubot chain <hook>`
pub fn chain(config: &OsuBotConfig, hook: &str) -> Result<(), OsuBotError> {
    let manager = manager(config)?;
    println!("{hook}: {}", manager.hook_state(hook));
    let loaded: Vec<&str> = manager
        .compiled_chain(hook)
        .map(|c| c.names())
        .unwrap_or_default();
    for (i, name) in manager.chain(hook).iter().enumerate() {
        let marker = if loaded.contains(&name.as_str()) {
            ""
        } else {
            " (not loaded)"
        };
        println!("  {}. {name}{marker}", i + 1);
    }
    Ok(())
}

/// `osubot apply <hook> [--input <file>]`
pub async fn apply(
    config: &OsuBotConfig,
    hook: &str,
    input: Option<&Path>,
) -> Result<(), OsuBotError> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| OsuBotError::Io {
            path: path.display().to_string(),
            source,
        })?,
        None => std::io::read_to_string(std::io::stdin()).map_err(|source| OsuBotError::Io {
            path: "<stdin>".to_string(),
            source,
        })?,
    };
    let record = parse_record(&raw)?;

    let manager = manager(config)?;
    let outcome = manager.run_async(hook, &record).await;
    if !outcome.is_clean() {
        tracing::warn!(hook, failed = outcome.failures.len(), "some minifilters failed");
    }

    let pretty = serde_json::to_string_pretty(&outcome.record)
        .map_err(|e| OsuBotError::Internal(format!("failed to encode record: {e}")))?;
    println!("{pretty}");
    Ok(())
}

/// `osubot check`
pub fn check(config: &OsuBotConfig) -> Result<(), OsuBotError> {
    let manager = manager(config)?;
    println!(
        "config ok: {} minifilter(s) across {} hook(s)",
        manager.registry().len(),
        manager.hooks().len()
    );
    for hook in manager.hooks() {
        let loaded = manager.compiled_chain(hook).map_or(0, |c| c.len());
        println!(
            "  {hook}: {} ({loaded}/{} loaded)",
            manager.hook_state(hook),
            manager.registry().members(hook).len()
        );
    }
    Ok(())
}

/// Parse a JSON object into a record.
fn parse_record(raw: &str) -> Result<DataRecord, OsuBotError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(OsuBotError::Internal(format!(
            "input must be a JSON object, got {}",
            type_name(&other)
        ))),
        Err(e) => Err(OsuBotError::Internal(format!("input is not valid JSON: {e}"))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
