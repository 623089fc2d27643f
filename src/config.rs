//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "focus-timer")]
#[command(about = "A Pomodoro focus timer with audio cues and a persisted history")]
#[command(version = "1.0.0")]
pub struct Config {
    /// File holding the log of finished cycles
    #[arg(long, default_value = "db/history.json")]
    pub history_file: PathBuf,

    /// Focus duration in minutes for a fresh cycle
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u32).range(1..))]
    pub minutes: u32,

    /// Audio clip played on start, pause, reset and finish
    #[arg(long, default_value = "sound.mp3")]
    pub sound_file: PathBuf,

    /// Player command line; the sound file is appended as the last argument
    #[arg(long, default_value = "mpg123 -q")]
    pub player: String,

    /// Disable audio cues
    #[arg(long)]
    pub no_sound: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
