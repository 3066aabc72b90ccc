// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the filter pipeline crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A record flowing through a hook.
///
/// The pipeline never inspects its contents; only minifilters do.
pub type DataRecord = serde_json::Map<String, serde_json::Value>;

/// Build outcome of a single hook, fixed once the manager is built.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HookState {
    /// The compiled chain has at least one processor.
    Ready,
    /// A dependency cycle was detected; the hook passes records through.
    Disabled,
    /// Nothing to run: no members, or no member processor could be loaded.
    Empty,
}

impl HookState {
    /// Whether `apply` on this hook runs any processor at all.
    pub fn is_active(self) -> bool {
        matches!(self, HookState::Ready)
    }
}
