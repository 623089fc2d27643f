//! External collaborators module
//!
//! This module contains the fire-and-forget audio cue players.

pub mod sound;

// Re-export main types
pub use sound::{Cue, CommandPlayer, SilentPlayer, SoundCue};
