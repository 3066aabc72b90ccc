// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in minifilter catalog.
//!
//! Returns the manifests and processors for the minifilters compiled into
//! the osubot binary. No files are read.

use std::sync::Arc;

use osubot_core::ProcessorHandle;
use osubot_filter::{FilterManifest, ProcessorCatalog};

use crate::lookup::BeatmapLookup;
use crate::score_card::ScoreCardBasic;
use crate::today_bp::TodayBpBasic;
use crate::user_card::{UserCardBasic, UserCardExtra, UserCardTier};

const VERSION: &str = "1.0.0";

/// Returns manifests for all built-in minifilters.
///
/// - `user_card_basic`, `user_card_extra`, `user_card_tier` (hook `user_card`)
/// - `score_card_basic` (hook `score_card`)
/// - `today_bp_basic` (hook `today_bp`)
pub fn builtin_manifests() -> Vec<FilterManifest> {
    let manifest = |name: &str| {
        let mut m = FilterManifest::new(name);
        m.version = VERSION.to_string();
        m
    };

    vec![
        manifest(UserCardBasic::NAME)
            .with_description("Formats pp, ranks, and play time on user cards")
            .with_hooks(["user_card"]),
        manifest(UserCardExtra::NAME)
            .with_description("Formats accuracy, max combo, and play count on user cards")
            .with_hooks(["user_card"])
            .with_depends([UserCardBasic::NAME]),
        manifest(UserCardTier::NAME)
            .with_description("Adds a pp tier badge and colour to user cards")
            .with_hooks(["user_card"])
            .with_depends([UserCardBasic::NAME]),
        manifest(ScoreCardBasic::NAME)
            .with_description("Completes beatmap and beatmapset objects on a score")
            .with_hooks(["score_card"]),
        manifest(TodayBpBasic::NAME)
            .with_description("Completes beatmap objects on every score of today's best performances")
            .with_hooks(["today_bp"]),
    ]
}

/// Processor factories for the built-in minifilters, keyed by name.
pub fn builtin_processors(lookup: Arc<dyn BeatmapLookup>) -> ProcessorCatalog {
    ProcessorCatalog::new()
        .with(UserCardBasic::NAME, ProcessorHandle::sync(UserCardBasic))
        .with(UserCardExtra::NAME, ProcessorHandle::sync(UserCardExtra))
        .with(UserCardTier::NAME, ProcessorHandle::sync(UserCardTier))
        .with(
            ScoreCardBasic::NAME,
            ProcessorHandle::asynchronous(ScoreCardBasic::new(Arc::clone(&lookup))),
        )
        .with(
            TodayBpBasic::NAME,
            ProcessorHandle::asynchronous(TodayBpBasic::new(lookup)),
        )
}

/// Search the built-in catalog by query string.
///
/// Filters entries whose name, description, or hooks contain the query
/// (case-insensitive). If query is empty, returns all entries.
pub fn search_catalog(query: &str) -> Vec<FilterManifest> {
    builtin_manifests()
        .into_iter()
        .filter(|m| m.matches_query(query))
        .collect()
}
