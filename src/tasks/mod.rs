//! Background tasks module
//!
//! This module contains the tick schedule that drives a running countdown.

pub mod ticker;

// Re-export main functions
pub use ticker::{tick_task, TICK_PERIOD};
