//! Timer state snapshot exposed to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default length of a focus cycle (25 minutes)
pub const DEFAULT_FOCUS_SECONDS: u32 = 25 * 60;

/// Whether the countdown is moving
///
/// `Idle` and `Paused` behave the same; they only differ in the message shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerStatus::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}

/// A transition applied by one of the timer commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Started,
    Paused,
    Reset,
    Finished { label: String },
    DurationSet { minutes: u32 },
}

impl TimerEvent {
    /// Status line shown to the user after the transition
    pub fn message(&self) -> String {
        match self {
            TimerEvent::Started => "Focus started!".to_string(),
            TimerEvent::Paused => "Timer paused.".to_string(),
            TimerEvent::Reset => "Timer reset.".to_string(),
            TimerEvent::Finished { .. } => "Time finished.".to_string(),
            TimerEvent::DurationSet { minutes } => format!("Pomodoro set to {} minutes.", minutes),
        }
    }
}

/// Point-in-time view of the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub configured_seconds: u32,
    pub status: TimerStatus,
    pub last_event: Option<TimerEvent>,
    pub last_event_time: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create an idle timer state for a full cycle of `configured_seconds`
    pub fn new(configured_seconds: u32) -> Self {
        Self {
            remaining_seconds: configured_seconds,
            configured_seconds,
            status: TimerStatus::Idle,
            last_event: None,
            last_event_time: None,
        }
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        format_time(self.remaining_seconds)
    }

    /// Message for the most recent transition, if any
    pub fn message(&self) -> Option<String> {
        self.last_event.as_ref().map(TimerEvent::message)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_SECONDS)
    }
}

/// Format a number of seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so 90 minutes reads `90:00`.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
