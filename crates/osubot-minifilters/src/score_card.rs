// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `score_card_basic`: make sure a score carries nested `beatmap` and
//! `beatmapset` objects before it reaches the card renderer.

use std::sync::Arc;

use async_trait::async_trait;
use osubot_core::{AsyncDataTransformer, DataRecord, OsuBotError};
use serde_json::{json, Map, Value};

use crate::lookup::BeatmapLookup;

pub struct ScoreCardBasic {
    lookup: Arc<dyn BeatmapLookup>,
}

impl ScoreCardBasic {
    pub const NAME: &'static str = "score_card_basic";

    pub fn new(lookup: Arc<dyn BeatmapLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl AsyncDataTransformer for ScoreCardBasic {
    async fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        let id = beatmap_id(record, &["beatmap_id"]);
        match id {
            Some(id) => Ok(complete_score(record, id, self.lookup.as_ref()).await),
            None => {
                let mut out = record.clone();
                fill_defaults(&mut out, Value::from(0));
                Ok(out)
            }
        }
    }
}

/// True once both nested objects are present.
pub(crate) fn is_complete(score: &DataRecord) -> bool {
    score.get("beatmap").is_some_and(Value::is_object)
        && score.get("beatmapset").is_some_and(Value::is_object)
}

/// Finds the beatmap id in the first non-empty of `keys`, then in
/// `beatmap.id`. Zero, empty strings, and non-numeric values do not count.
pub(crate) fn beatmap_id(score: &DataRecord, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| score.get(*key))
        .chain(
            score
                .get("beatmap")
                .and_then(Value::as_object)
                .and_then(|b| b.get("id")),
        )
        .find_map(as_id)
}

fn as_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.filter(|id| *id != 0)
}

/// Completes a score with beatmap `id`, falling back to values already on
/// the record if the lookup fails.
pub(crate) async fn complete_score(
    score: &DataRecord,
    id: u64,
    lookup: &dyn BeatmapLookup,
) -> DataRecord {
    let mut out = score.clone();
    if is_complete(&out) {
        return out;
    }

    match lookup.beatmap(id).await {
        Ok(info) => fill_from_lookup(&mut out, &info),
        Err(e) => {
            tracing::debug!(beatmap_id = id, error = %e, "beatmap lookup failed, using defaults");
            fill_defaults(&mut out, Value::from(id));
        }
    }
    out
}

fn field(source: &Map<String, Value>, key: &str, default: Value) -> Value {
    source.get(key).cloned().unwrap_or(default)
}

fn missing(score: &DataRecord, key: &str) -> bool {
    !score.get(key).is_some_and(Value::is_object)
}

fn fill_from_lookup(score: &mut DataRecord, info: &DataRecord) {
    if missing(score, "beatmap") {
        score.insert(
            "beatmap".into(),
            json!({
                "id": field(info, "id", Value::Null),
                "beatmapset_id": field(info, "beatmapset_id", Value::Null),
                "version": field(info, "version", json!("Unknown")),
                "difficulty_rating": field(info, "difficulty_rating", json!(0)),
                "mode": field(info, "mode", json!("osu")),
                "status": field(info, "status", json!("ranked")),
                "total_length": field(info, "total_length", json!(0)),
                "hit_length": field(info, "hit_length", json!(0)),
                "bpm": field(info, "bpm", json!(0)),
                "cs": field(info, "cs", json!(0)),
                "drain": field(info, "drain", json!(0)),
                "accuracy": field(info, "accuracy", json!(0)),
                "ar": field(info, "ar", json!(0)),
            }),
        );
    }

    if missing(score, "beatmapset") {
        let empty = Map::new();
        let set = info
            .get("beatmapset")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        score.insert(
            "beatmapset".into(),
            json!({
                "id": field(set, "id", field(info, "beatmapset_id", Value::Null)),
                "title": field(set, "title", json!("Unknown")),
                "artist": field(set, "artist", json!("Unknown")),
                "creator": field(set, "creator", json!("Unknown")),
                "covers": field(set, "covers", json!({})),
            }),
        );
    }
}

/// Minimal nested objects built from flat fields on the score itself.
pub(crate) fn fill_defaults(score: &mut DataRecord, id: Value) {
    if missing(score, "beatmap") {
        let beatmap = json!({
            "id": id,
            "beatmapset_id": field(score, "beatmapset_id", json!(0)),
            "version": field(score, "version", json!("Unknown")),
            "difficulty_rating": field(score, "difficulty_rating", json!(0)),
        });
        score.insert("beatmap".into(), beatmap);
    }

    if missing(score, "beatmapset") {
        let beatmapset = json!({
            "id": field(score, "beatmapset_id", json!(0)),
            "title": field(score, "beatmapset_title", json!("Unknown")),
            "artist": field(score, "beatmapset_artist", json!("Unknown")),
            "covers": {},
        });
        score.insert("beatmapset".into(), beatmapset);
    }
}
