//! Focus Timer - a single-user Pomodoro timer
//!
//! This library provides the countdown state machine, the persisted log of
//! finished cycles and the audio cues played on each transition.

pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{HistoryError, SoundError, TimerError};
pub use history::{HistoryEntry, HistoryStore};
pub use services::{Cue, SoundCue};
pub use state::{format_time, AppState, TimerEngine, TimerState, TimerStatus};
pub use utils::signals::shutdown_signal;
