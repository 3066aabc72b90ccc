// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Beatmap metadata lookup used to complete score records.

use async_trait::async_trait;
use osubot_core::{DataRecord, OsuBotError};

/// Fetches beatmap metadata by id.
///
/// The returned record follows the osu! API beatmap shape, with an optional
/// nested `beatmapset` object.
#[async_trait]
pub trait BeatmapLookup: Send + Sync {
    async fn beatmap(&self, beatmap_id: u64) -> Result<DataRecord, OsuBotError>;
}

/// A lookup with no backing service. Every request fails, so the score
/// minifilters fall back to values already present on the record.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineLookup;

#[async_trait]
impl BeatmapLookup for OfflineLookup {
    async fn beatmap(&self, beatmap_id: u64) -> Result<DataRecord, OsuBotError> {
        Err(OsuBotError::Internal(format!(
            "beatmap lookup is offline (requested {beatmap_id})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_lookup_always_fails() {
        let err = OfflineLookup.beatmap(75).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
    }
}
