// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in minifilters compiled into the osubot binary.
//!
//! - `user_card_basic`, `user_card_extra`, `user_card_tier` format the
//!   statistics block of a user card.
//! - `score_card_basic` and `today_bp_basic` make sure score records carry
//!   nested `beatmap` and `beatmapset` objects, asking a [`BeatmapLookup`]
//!   for anything missing.

pub mod catalog;
pub mod format;
pub mod lookup;
pub mod score_card;
pub mod today_bp;
pub mod user_card;

pub use catalog::{builtin_manifests, builtin_processors, search_catalog};
pub use lookup::{BeatmapLookup, OfflineLookup};
pub use score_card::ScoreCardBasic;
pub use today_bp::TodayBpBasic;
pub use user_card::{UserCardBasic, UserCardExtra, UserCardTier};
