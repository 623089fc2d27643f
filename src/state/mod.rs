//! State management module
//!
//! This module contains the timer state machine, its snapshot type and the
//! application state that owns both.

pub mod app_state;
pub mod timer_engine;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_engine::{parse_minutes, TickOutcome, TimerEngine};
pub use timer_state::{format_time, TimerEvent, TimerState, TimerStatus, DEFAULT_FOCUS_SECONDS};
