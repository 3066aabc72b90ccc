// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide filter manager.
//!
//! The manager is published through an `ArcSwapOption`, so readers never
//! lock. The first build is single-flight: concurrent first callers wait on
//! the build lock and then see the published manager instead of building
//! again. `reset` exists for test isolation and explicit full rebuilds.

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use osubot_core::{DataRecord, OsuBotError};

use crate::manager::FilterManager;

static MANAGER: LazyLock<ArcSwapOption<FilterManager>> = LazyLock::new(ArcSwapOption::empty);
static BUILD_LOCK: Mutex<()> = Mutex::new(());

/// The published manager, if one has been built.
pub fn get() -> Option<Arc<FilterManager>> {
    MANAGER.load_full()
}

/// Return the published manager, building it with `build` if none exists.
///
/// `build` runs at most once across concurrent callers. If it fails, nothing
/// is published and the next caller tries again.
pub fn get_or_init<F>(build: F) -> Result<Arc<FilterManager>, OsuBotError>
where
    F: FnOnce() -> Result<FilterManager, OsuBotError>,
{
    if let Some(manager) = MANAGER.load_full() {
        return Ok(manager);
    }

    let _guard = BUILD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(manager) = MANAGER.load_full() {
        return Ok(manager);
    }

    let manager = Arc::new(build()?);
    MANAGER.store(Some(Arc::clone(&manager)));
    tracing::info!("minifilter manager published");
    Ok(manager)
}

/// Drop the published manager. Callers holding an `Arc` keep using theirs.
pub fn reset() {
    let _guard = BUILD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    MANAGER.store(None);
}

/// Apply `hook` with the published manager; identity if none is published.
pub fn apply(hook: &str, record: &DataRecord) -> DataRecord {
    match get() {
        Some(manager) => manager.apply(hook, record),
        None => {
            tracing::debug!(hook, "no minifilter manager published, passing record through");
            record.clone()
        }
    }
}

/// Async variant of [`apply`].
pub async fn apply_async(hook: &str, record: &DataRecord) -> DataRecord {
    match get() {
        Some(manager) => manager.apply_async(hook, record).await,
        None => {
            tracing::debug!(hook, "no minifilter manager published, passing record through");
            record.clone()
        }
    }
}
