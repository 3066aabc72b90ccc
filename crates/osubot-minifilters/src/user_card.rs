// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User card minifilters.
//!
//! All three read the record's `statistics` object and add display fields at
//! the top level. `user_card_extra` and `user_card_tier` depend on
//! `user_card_basic`, so they always see its output.

use osubot_core::{DataRecord, DataTransformer, OsuBotError};
use serde_json::Value;

use crate::format::{number, rank, statistics, thousands, truncate};

const SECONDS_PER_HOUR: i64 = 3600;

/// Formats pp, global and country rank, and play time.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserCardBasic;

impl UserCardBasic {
    pub const NAME: &'static str = "user_card_basic";
}

impl DataTransformer for UserCardBasic {
    fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        let stats = statistics(Self::NAME, record)?;
        let pp = truncate(number(Self::NAME, stats, "pp")?);
        let global_rank = truncate(number(Self::NAME, stats, "global_rank")?);
        let country_rank = truncate(number(Self::NAME, stats, "country_rank")?);
        let hours = truncate(number(Self::NAME, stats, "play_time")?) / SECONDS_PER_HOUR;

        let mut out = record.clone();
        out.insert("pp_formatted".into(), Value::String(thousands(pp)));
        out.insert("rank_formatted".into(), Value::String(rank(global_rank)));
        out.insert(
            "country_rank_formatted".into(),
            Value::String(rank(country_rank)),
        );
        out.insert(
            "play_time_formatted".into(),
            Value::String(format!("{}h", thousands(hours))),
        );
        Ok(out)
    }
}

/// Formats accuracy, max combo, and play count.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserCardExtra;

impl UserCardExtra {
    pub const NAME: &'static str = "user_card_extra";
}

impl DataTransformer for UserCardExtra {
    fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        let stats = statistics(Self::NAME, record)?;
        let accuracy = number(Self::NAME, stats, "hit_accuracy")?;
        let max_combo = truncate(number(Self::NAME, stats, "maximum_combo")?);
        let play_count = truncate(number(Self::NAME, stats, "play_count")?);

        let mut out = record.clone();
        out.insert(
            "accuracy_formatted".into(),
            Value::String(format!("{accuracy:.2}%")),
        );
        out.insert(
            "max_combo_formatted".into(),
            Value::String(thousands(max_combo)),
        );
        out.insert(
            "play_count_formatted".into(),
            Value::String(thousands(play_count)),
        );
        Ok(out)
    }
}

/// A pp bracket shown as a badge on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub name: &'static str,
    pub color: &'static str,
}

/// Brackets by minimum pp, highest first.
const TIERS: [(f64, Tier); 4] = [
    (10000.0, Tier { name: "diamond", color: "#b9f2ff" }),
    (7000.0, Tier { name: "platinum", color: "#e5e4e2" }),
    (4000.0, Tier { name: "gold", color: "#ffd700" }),
    (2000.0, Tier { name: "silver", color: "#c0c0c0" }),
];

const BRONZE: Tier = Tier {
    name: "bronze",
    color: "#cd7f32",
};

/// The tier for a pp value.
pub fn tier_for(pp: f64) -> Tier {
    TIERS
        .iter()
        .find(|(min, _)| pp >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(BRONZE)
}

/// Adds `tier`, `tier_color`, and the raw `play_time_hours`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserCardTier;

impl UserCardTier {
    pub const NAME: &'static str = "user_card_tier";
}

impl DataTransformer for UserCardTier {
    fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        let stats = statistics(Self::NAME, record)?;
        let pp = number(Self::NAME, stats, "pp")?;
        let hours = truncate(number(Self::NAME, stats, "play_time")?) / SECONDS_PER_HOUR;
        let tier = tier_for(pp);

        let mut out = record.clone();
        out.insert("tier".into(), Value::String(tier.name.to_string()));
        out.insert("tier_color".into(), Value::String(tier.color.to_string()));
        out.insert("play_time_hours".into(), Value::from(hours));
        Ok(out)
    }
}
