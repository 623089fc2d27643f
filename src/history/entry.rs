//! History record structure

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in the history file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One finished cycle. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryEntry {
    /// Local date and time the cycle finished
    #[serde(rename = "date")]
    pub timestamp: String,
    /// Countdown display (`MM:SS`) at finish time
    #[serde(rename = "duration")]
    pub duration_label: String,
}

impl HistoryEntry {
    pub fn new(timestamp: impl Into<String>, duration_label: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            duration_label: duration_label.into(),
        }
    }

    /// Record stamped with the current local time
    pub fn now(duration_label: impl Into<String>) -> Self {
        Self::at(Local::now(), duration_label)
    }

    pub fn at(time: DateTime<Local>, duration_label: impl Into<String>) -> Self {
        Self::new(time.format(TIMESTAMP_FORMAT).to_string(), duration_label)
    }
}
