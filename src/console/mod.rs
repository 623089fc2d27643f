//! Line-oriented terminal front end
//!
//! This module forwards typed commands into [`AppState`] and renders the
//! timer and history back to the terminal.

pub mod commands;
pub mod render;

use std::{
    future::Future,
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::AppState;

// Re-export main functions
pub use commands::{execute, parse_command, ConsoleCommand, Preset, Reply};
pub use render::{history_lines, render_task};

/// Read stdin lines on a dedicated OS thread.
///
/// The thread blocks in `read`, so it must stay off the runtime; otherwise
/// dropping the runtime waits for the next line.
pub fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(16);
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("Stopped reading stdin: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Run commands from `lines` until `quit` or the sender goes away
pub async fn run_console(state: Arc<AppState>, mut lines: mpsc::Receiver<String>) {
    println!("{}", commands::HELP);

    while let Some(line) = lines.recv().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match parse_command(line) {
            Some(command) => execute(&state, command),
            None => Reply::text(format!("Unknown command '{}'.\n{}", line, commands::HELP)),
        };

        for text in &reply.lines {
            println!("{}", text);
        }
        if reply.quit {
            break;
        }
    }

    info!("Console closed");
}

/// Run the console until it ends or `shutdown` resolves, then cancel ticks
pub async fn run_until_shutdown<F>(state: Arc<AppState>, lines: mpsc::Receiver<String>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = run_console(Arc::clone(&state), lines) => {}
        _ = shutdown => {
            info!("Shutdown signal received");
        }
    }
    state.shutdown();
}
