//! Error types for the timer core
//!
//! Only [`TimerError`] is meant to reach the user. History and sound errors
//! are handled where they occur and degrade to "empty history" or "no sound".

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by timer commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The requested duration is not a whole number of minutes above zero
    #[error("invalid duration '{input}': please enter a valid number greater than zero")]
    InvalidDuration { input: String },
}

/// Errors raised by the history store
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The history file exists but does not hold a list of history records
    #[error("history file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("history file {} could not be accessed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while trying to play an audio cue
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("sound file {} not found", .0.display())]
    MissingFile(PathBuf),

    #[error("no audio player command configured")]
    EmptyPlayer,

    #[error("failed to launch audio player '{player}': {source}")]
    Spawn {
        player: String,
        #[source]
        source: std::io::Error,
    },
}
