//! Focus Timer - a single-user Pomodoro timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tracing::{info, warn};

use focus_timer::{
    config::Config,
    console::{render_task, run_until_shutdown, spawn_stdin_reader},
    history::HistoryStore,
    services::{CommandPlayer, SilentPlayer, SoundCue},
    state::{AppState, TimerEngine},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they do not overwrite the countdown line
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting focus-timer v1.0.0");
    info!("Configuration: minutes={}, history={}, sound={}",
          config.minutes, config.history_file.display(),
          if config.no_sound { "off".to_string() } else { config.sound_file.display().to_string() });

    let sound = sound_player(&config);
    let engine = TimerEngine::with_minutes(config.minutes)?;
    let history = HistoryStore::new(config.history_file.clone());

    let state = Arc::new(AppState::new(engine, history, sound));

    // Draw the countdown in the background
    let render_state = Arc::clone(&state);
    let renderer = tokio::spawn(async move {
        render_task(render_state).await;
    });

    let lines = spawn_stdin_reader()?;
    run_until_shutdown(Arc::clone(&state), lines, shutdown_signal()).await;

    renderer.abort();
    info!("Timer shutdown complete");
    Ok(())
}

fn sound_player(config: &Config) -> Arc<dyn SoundCue> {
    if config.no_sound {
        return Arc::new(SilentPlayer);
    }
    match CommandPlayer::new(&config.player, config.sound_file.clone()) {
        Ok(player) => Arc::new(player),
        Err(e) => {
            warn!("Audio cues disabled: {}", e);
            Arc::new(SilentPlayer)
        }
    }
}
