// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Number formatting and field access shared by the card minifilters.

use osubot_core::{DataRecord, OsuBotError};
use serde_json::Value;

/// Formats an integer with `,` thousands separators.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a rank as `#1,234`; zero means unranked and renders `#-`.
pub fn rank(value: i64) -> String {
    if value == 0 {
        "#-".to_string()
    } else {
        format!("#{}", thousands(value))
    }
}

/// The `statistics` object of a user record. Missing or `null` reads as empty.
pub fn statistics<'a>(
    filter: &str,
    record: &'a DataRecord,
) -> Result<Option<&'a DataRecord>, OsuBotError> {
    match record.get("statistics") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(OsuBotError::transform(
            filter,
            format!("statistics must be an object, got {other}"),
        )),
    }
}

/// Reads a numeric statistic. Missing and `null` read as zero; numeric
/// strings are accepted since some endpoints send them that way.
pub fn number(filter: &str, stats: Option<&DataRecord>, key: &str) -> Result<f64, OsuBotError> {
    match stats.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| OsuBotError::transform(filter, format!("{key} is out of range"))),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            OsuBotError::transform(filter, format!("{key} is not a number: {s:?}"))
        }),
        Some(other) => Err(OsuBotError::transform(
            filter,
            format!("{key} is not a number: {other}"),
        )),
    }
}

/// Truncates toward zero, like an integer cast of a float statistic.
pub fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
