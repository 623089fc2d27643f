//! Countdown state machine
//!
//! The engine is plain data with no clock and no I/O. Every command returns the
//! [`TimerEvent`] it applied so the owner can play cues and record history.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//! Running --tick at 00:00--> finish --> Idle
//! any --reset--> Idle        any --finish--> Idle
//! ```

use crate::error::TimerError;

use super::timer_state::{format_time, TimerEvent, TimerState, TimerStatus, DEFAULT_FOCUS_SECONDS};

/// Result of a single one-second tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed
    Skipped,
    /// One second was taken off; carries the new remaining time
    Decremented(u32),
    /// The countdown was already at zero and the cycle finished
    Finished(TimerEvent),
}

/// Countdown engine for a single focus cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEngine {
    configured_seconds: u32,
    remaining_seconds: u32,
    status: TimerStatus,
}

impl TimerEngine {
    /// Create an idle engine configured for `minutes`
    pub fn with_minutes(minutes: u32) -> Result<Self, TimerError> {
        let configured_seconds = minutes_to_seconds(i64::from(minutes))?;
        Ok(Self {
            configured_seconds,
            remaining_seconds: configured_seconds,
            status: TimerStatus::Idle,
        })
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn configured_seconds(&self) -> u32 {
        self.configured_seconds
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    /// Snapshot without event information
    pub fn snapshot(&self) -> TimerState {
        TimerState {
            remaining_seconds: self.remaining_seconds,
            configured_seconds: self.configured_seconds,
            status: self.status,
            last_event: None,
            last_event_time: None,
        }
    }

    /// Begin or resume the countdown. Returns `None` if already running.
    pub fn start(&mut self) -> Option<TimerEvent> {
        if self.status.is_running() {
            return None;
        }
        self.status = TimerStatus::Running;
        Some(TimerEvent::Started)
    }

    pub fn pause(&mut self) -> TimerEvent {
        self.status = TimerStatus::Paused;
        TimerEvent::Paused
    }

    pub fn reset(&mut self) -> TimerEvent {
        self.status = TimerStatus::Idle;
        self.remaining_seconds = self.configured_seconds;
        TimerEvent::Reset
    }

    /// End the current cycle.
    ///
    /// The label is the countdown display at the moment of finishing, so an
    /// early finish records the time that was still left.
    pub fn finish(&mut self) -> TimerEvent {
        self.status = TimerStatus::Idle;
        let label = format_time(self.remaining_seconds);
        self.remaining_seconds = self.configured_seconds;
        TimerEvent::Finished { label }
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.status.is_running() {
            return TickOutcome::Skipped;
        }
        if self.remaining_seconds == 0 {
            return TickOutcome::Finished(self.finish());
        }
        self.remaining_seconds -= 1;
        TickOutcome::Decremented(self.remaining_seconds)
    }

    /// Configure a new cycle length and restart the countdown from it.
    ///
    /// On error nothing changes.
    pub fn set_duration(&mut self, minutes: i64) -> Result<TimerEvent, TimerError> {
        let seconds = minutes_to_seconds(minutes)?;
        self.configured_seconds = seconds;
        self.remaining_seconds = seconds;
        Ok(TimerEvent::DurationSet { minutes: seconds / 60 })
    }

    /// Same as [`set_duration`](Self::set_duration) for raw user input
    pub fn set_duration_input(&mut self, input: &str) -> Result<TimerEvent, TimerError> {
        let minutes = parse_minutes(input)?;
        self.set_duration(i64::from(minutes))
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self {
            configured_seconds: DEFAULT_FOCUS_SECONDS,
            remaining_seconds: DEFAULT_FOCUS_SECONDS,
            status: TimerStatus::Idle,
        }
    }
}

/// Parse user input as a positive whole number of minutes
pub fn parse_minutes(input: &str) -> Result<u32, TimerError> {
    let invalid = || TimerError::InvalidDuration { input: input.to_string() };
    let minutes: i64 = input.trim().parse().map_err(|_| invalid())?;
    minutes_to_seconds(minutes).map_err(|_| invalid())?;
    u32::try_from(minutes).map_err(|_| invalid())
}

fn minutes_to_seconds(minutes: i64) -> Result<u32, TimerError> {
    let invalid = || TimerError::InvalidDuration { input: minutes.to_string() };
    if minutes <= 0 {
        return Err(invalid());
    }
    u32::try_from(minutes)
        .ok()
        .and_then(|m| m.checked_mul(60))
        .ok_or_else(invalid)
}
