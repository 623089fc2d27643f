//! Terminal rendering of timer updates and history

use std::{io::Write, sync::Arc};

use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::{history::HistoryEntry, state::{AppState, TimerState}};

/// Redraw the countdown on every update and print transition messages
pub async fn render_task(state: Arc<AppState>) {
    let mut timer_rx = state.watch_timer();
    let mut event_rx = state.subscribe_events();

    loop {
        tokio::select! {
            changed = timer_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let timer = timer_rx.borrow_and_update().clone();
                draw(&timer);
            }
            event = event_rx.recv() => match event {
                Ok(event) => println!("\n{}", event.message()),
                Err(RecvError::Lagged(skipped)) => debug!("Render skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            },
        }
    }
}

fn draw(timer: &TimerState) {
    let mut stdout = std::io::stdout();
    // Trailing spaces clear a longer previous status label
    let drawn = write!(stdout, "\r{} [{}]    ", timer.display(), timer.status.label())
        .and_then(|()| stdout.flush());
    if let Err(e) = drawn {
        debug!("Failed to draw countdown: {}", e);
    }
}

/// Lines for the history view, oldest first
pub fn history_lines(entries: &[HistoryEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No history available.".to_string()];
    }
    entries
        .iter()
        .map(|entry| format!("Date: {}  Duration: {}", entry.timestamp, entry.duration_label))
        .collect()
}
