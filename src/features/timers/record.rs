//! Timer records and their persisted representation.
//!
//! The store file is a single JSON document mapping owner ids to that owner's
//! pending timers, in insertion order. Finish timestamps are written as local
//! wall-clock strings with minute precision and no timezone component.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every timer runs for exactly this long, measured from submission.
pub const TIMER_DURATION_HOURS: i64 = 8;

/// Timestamp format used for `finish` values in the store file.
pub const FINISH_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Owner id mapped to that owner's pending timers, in insertion order.
/// A `BTreeMap` keeps the serialized file stable under reload.
pub type Registry = BTreeMap<u64, Vec<TimerRecord>>;

/// A single pending timer. Immutable once created; the owning user id is the
/// registry key, not a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    /// Activity nickname as typed by the owner, trimmed.
    pub label: String,
    /// Absolute deadline at which the reminder is due.
    #[serde(with = "finish_format")]
    pub finish: NaiveDateTime,
    /// Channel the reminder is delivered to.
    pub channel_id: u64,
}

impl TimerRecord {
    /// Identity of this record's scheduled task.
    pub fn key(&self, owner_id: u64) -> TimerKey {
        TimerKey {
            owner_id,
            label: self.label.clone(),
            finish: self.finish,
        }
    }
}

/// Identity of a scheduled timer task: owner + label + deadline. Duplicate
/// labels per owner are allowed; the deadline disambiguates all but timers
/// created in the same minute with the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub owner_id: u64,
    pub label: String,
    pub finish: NaiveDateTime,
}

mod finish_format {
    use super::{NaiveDateTime, FINISH_FORMAT};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(finish: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&finish.format(FINISH_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FINISH_FORMAT).map_err(serde::de::Error::custom)
    }
}
