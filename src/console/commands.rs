//! Console command parsing and dispatch

use std::sync::Arc;

use tracing::error;

use crate::state::AppState;
use super::render::history_lines;

pub const HELP: &str = "Commands: start | pause | reset | finish | set <minutes> | \
preset <focus|study|short> | history | clear | status | help | quit";

/// Built-in cycle lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Standard focus block
    Focus,
    /// Study and work sessions
    Study,
    /// Shorter pauses
    Short,
}

impl Preset {
    pub fn minutes(&self) -> i64 {
        match self {
            Preset::Focus => 25,
            Preset::Study => 50,
            Preset::Short => 15,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "focus" => Some(Preset::Focus),
            "study" => Some(Preset::Study),
            "short" => Some(Preset::Short),
            _ => None,
        }
    }
}

/// A user action typed at the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Pause,
    Reset,
    Finish,
    /// Raw minutes input; validated by the timer
    SetDuration(String),
    Preset(Preset),
    History,
    ClearHistory,
    Status,
    Help,
    Quit,
}

/// Text to print after a command, and whether to stop reading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    pub fn text(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: false,
        }
    }

    fn none() -> Self {
        Self::default()
    }
}

/// Parse one input line. Returns `None` for unknown commands.
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_lowercase();
    let argument = words.next();

    let parsed = match (command.as_str(), argument) {
        ("start", None) => ConsoleCommand::Start,
        ("pause", None) => ConsoleCommand::Pause,
        ("reset", None) => ConsoleCommand::Reset,
        ("finish", None) => ConsoleCommand::Finish,
        ("set", Some(minutes)) => ConsoleCommand::SetDuration(minutes.to_string()),
        ("preset", Some(name)) => ConsoleCommand::Preset(Preset::from_name(&name.to_lowercase())?),
        ("history", None) => ConsoleCommand::History,
        ("clear", None) => ConsoleCommand::ClearHistory,
        ("status", None) => ConsoleCommand::Status,
        ("help", None) => ConsoleCommand::Help,
        ("quit" | "exit", None) => ConsoleCommand::Quit,
        _ => return None,
    };

    if words.next().is_some() {
        return None;
    }
    Some(parsed)
}

/// Run a command against the timer.
///
/// Transition messages are printed by the render task; the reply only carries
/// output the command itself produces.
pub fn execute(state: &Arc<AppState>, command: ConsoleCommand) -> Reply {
    match command {
        ConsoleCommand::Start => {
            state.start();
            Reply::none()
        }
        ConsoleCommand::Pause => {
            state.pause();
            Reply::none()
        }
        ConsoleCommand::Reset => {
            state.reset();
            Reply::none()
        }
        ConsoleCommand::Finish => {
            state.finish();
            Reply::none()
        }
        ConsoleCommand::SetDuration(input) => match state.set_duration_input(&input) {
            Ok(_) => Reply::none(),
            Err(_) => Reply::text("Please enter a valid number greater than zero."),
        },
        ConsoleCommand::Preset(preset) => match state.set_duration(preset.minutes()) {
            Ok(_) => Reply::none(),
            Err(e) => Reply::text(e.to_string()),
        },
        ConsoleCommand::History => Reply {
            lines: history_lines(&state.read_history()),
            quit: false,
        },
        ConsoleCommand::ClearHistory => match state.clear_history() {
            Ok(()) => Reply::text("History deleted."),
            Err(e) => {
                error!("Failed to clear history: {}", e);
                Reply::text("Could not delete history.")
            }
        },
        ConsoleCommand::Status => {
            let timer = state.snapshot();
            let mut line = format!("{} [{}]", timer.display(), timer.status.label());
            if let Some(message) = timer.message() {
                line.push(' ');
                line.push_str(&message);
            }
            Reply::text(line)
        }
        ConsoleCommand::Help => Reply::text(HELP),
        ConsoleCommand::Quit => Reply {
            lines: Vec::new(),
            quit: true,
        },
    }
}
