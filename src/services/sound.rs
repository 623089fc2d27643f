//! Audio cues played on timer transitions

use std::{
    fmt,
    path::PathBuf,
    process::{Command, Stdio},
};

use tracing::{debug, warn};

use crate::error::SoundError;

/// Which transition a cue announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Start,
    Pause,
    Reset,
    Finish,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Start => "start",
            Cue::Pause => "pause",
            Cue::Reset => "reset",
            Cue::Finish => "finish",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Best-effort cue playback.
///
/// `play` must return promptly and never fail; players log problems instead.
pub trait SoundCue: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Plays cues by launching an external player command
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    sound_file: PathBuf,
}

impl CommandPlayer {
    /// Build from a whitespace-separated command line such as `mpg123 -q`
    pub fn new(command_line: &str, sound_file: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(SoundError::EmptyPlayer)?;
        Ok(Self {
            program,
            args: parts.collect(),
            sound_file: sound_file.into(),
        })
    }

    /// Launch the player without waiting for playback to end
    pub fn try_play(&self, cue: Cue) -> Result<(), SoundError> {
        if !self.sound_file.exists() {
            return Err(SoundError::MissingFile(self.sound_file.clone()));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.sound_file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SoundError::Spawn {
                player: self.program.clone(),
                source,
            })?;

        debug!("Playing {} cue with {}", cue, self.program);

        // Reap the child off the caller's thread
        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => debug!("{} cue player exited with {}", cue, status),
            Ok(_) => {}
            Err(e) => debug!("Failed to wait for {} cue player: {}", cue, e),
        });
        Ok(())
    }
}

impl SoundCue for CommandPlayer {
    fn play(&self, cue: Cue) {
        if let Err(e) = self.try_play(cue) {
            warn!("Could not play {} cue: {}", cue, e);
        }
    }
}

/// Player used when sound is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl SoundCue for SilentPlayer {
    fn play(&self, cue: Cue) {
        debug!("Sound disabled, skipping {} cue", cue);
    }
}
