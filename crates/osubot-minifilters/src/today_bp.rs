// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `today_bp_basic`: complete every score in a best-performance list.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use osubot_core::{AsyncDataTransformer, DataRecord, OsuBotError};
use serde_json::Value;

use crate::lookup::BeatmapLookup;
use crate::score_card::{beatmap_id, complete_score};

pub struct TodayBpBasic {
    lookup: Arc<dyn BeatmapLookup>,
}

impl TodayBpBasic {
    pub const NAME: &'static str = "today_bp_basic";

    pub fn new(lookup: Arc<dyn BeatmapLookup>) -> Self {
        Self { lookup }
    }

    async fn complete_entry(&self, entry: &Value) -> Value {
        let Some(score) = entry.as_object() else {
            return entry.clone();
        };
        // Entries without any usable id are left as they are.
        match beatmap_id(score, &["beatmap_id", "id"]) {
            Some(id) => Value::Object(complete_score(score, id, self.lookup.as_ref()).await),
            None => entry.clone(),
        }
    }
}

#[async_trait]
impl AsyncDataTransformer for TodayBpBasic {
    /// Lookups for all entries run concurrently; the list keeps its order.
    async fn process(&self, record: &DataRecord) -> Result<DataRecord, OsuBotError> {
        let mut out = record.clone();
        if let Some(Value::Array(scores)) = record.get("scores") {
            let completed = join_all(scores.iter().map(|s| self.complete_entry(s))).await;
            out.insert("scores".into(), Value::Array(completed));
        }
        Ok(out)
    }
}
