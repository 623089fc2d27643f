//! Main application state management
//!
//! [`AppState`] is the single owner of the timer. Every command and every tick
//! runs under one lock, so a tick can never interleave with a pause or reset.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::{HistoryError, TimerError},
    history::{HistoryEntry, HistoryStore},
    services::{Cue, SoundCue},
    tasks::tick_task,
};
use super::{TickOutcome, TimerEngine, TimerEvent, TimerState};

/// Engine plus the bookkeeping for its tick schedule
#[derive(Debug)]
struct Countdown {
    engine: TimerEngine,
    /// Identifies the current tick schedule; bumped on every arm and disarm
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    last_event: Option<TimerEvent>,
    last_event_time: Option<chrono::DateTime<Utc>>,
}

impl Countdown {
    fn snapshot(&self) -> TimerState {
        TimerState {
            last_event: self.last_event.clone(),
            last_event_time: self.last_event_time,
            ..self.engine.snapshot()
        }
    }
}

/// Main application state that owns the timer, history and sound collaborators
pub struct AppState {
    countdown: Mutex<Countdown>,
    history: HistoryStore,
    sound: Arc<dyn SoundCue>,
    /// Channel for transition notifications
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    pub fn new(engine: TimerEngine, history: HistoryStore, sound: Arc<dyn SoundCue>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        let countdown = Countdown {
            engine,
            generation: 0,
            ticker: None,
            last_event: None,
            last_event_time: None,
        };
        let (timer_update_tx, timer_update_rx) = watch::channel(countdown.snapshot());

        Self {
            countdown: Mutex::new(countdown),
            history,
            sound,
            event_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Current timer state
    pub fn snapshot(&self) -> TimerState {
        self.lock().snapshot()
    }

    /// Receive every timer state change, ticks included
    pub fn watch_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Receive every command transition
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Start or resume the countdown. No-op while already running.
    pub fn start(self: &Arc<Self>) -> TimerState {
        let mut countdown = self.lock();
        match countdown.engine.start() {
            Some(event) => {
                info!("Starting countdown at {}", countdown.snapshot().display());
                self.arm(&mut countdown);
                self.publish(&mut countdown, event, Some(Cue::Start));
            }
            None => debug!("Start ignored, countdown already running"),
        }
        countdown.snapshot()
    }

    pub fn pause(&self) -> TimerState {
        let mut countdown = self.lock();
        Self::disarm(&mut countdown);
        let event = countdown.engine.pause();
        info!("Countdown paused at {}", countdown.snapshot().display());
        self.publish(&mut countdown, event, Some(Cue::Pause));
        countdown.snapshot()
    }

    pub fn reset(&self) -> TimerState {
        let mut countdown = self.lock();
        Self::disarm(&mut countdown);
        let event = countdown.engine.reset();
        info!("Countdown reset");
        self.publish(&mut countdown, event, Some(Cue::Reset));
        countdown.snapshot()
    }

    /// End the current cycle early and record it
    pub fn finish(&self) -> TimerState {
        let mut countdown = self.lock();
        self.finish_locked(&mut countdown);
        countdown.snapshot()
    }

    /// Configure the cycle length in minutes.
    ///
    /// A running countdown keeps running from the new full duration.
    pub fn set_duration(self: &Arc<Self>, minutes: i64) -> Result<TimerState, TimerError> {
        let mut countdown = self.lock();
        let event = countdown.engine.set_duration(minutes).map_err(|e| {
            warn!("Rejected duration: {}", e);
            e
        })?;
        self.after_duration_set(&mut countdown, event);
        Ok(countdown.snapshot())
    }

    /// Configure the cycle length from raw user input
    pub fn set_duration_input(self: &Arc<Self>, input: &str) -> Result<TimerState, TimerError> {
        let mut countdown = self.lock();
        let event = countdown.engine.set_duration_input(input).map_err(|e| {
            warn!("Rejected duration: {}", e);
            e
        })?;
        self.after_duration_set(&mut countdown, event);
        Ok(countdown.snapshot())
    }

    /// Entries for the history view. Unreadable history reads as empty.
    pub fn read_history(&self) -> Vec<HistoryEntry> {
        match self.history.load_or_empty() {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to read history: {}", e);
                Vec::new()
            }
        }
    }

    /// Delete every history entry
    pub fn clear_history(&self) -> Result<(), HistoryError> {
        self.history.clear()
    }

    /// Apply one tick from the schedule identified by `generation`.
    ///
    /// Returns `false` once that schedule should stop.
    pub fn tick(&self, generation: u64) -> bool {
        let mut countdown = self.lock();
        if countdown.generation != generation {
            debug!("Dropping tick from stale schedule {}", generation);
            return false;
        }

        match countdown.engine.tick() {
            TickOutcome::Skipped => false,
            TickOutcome::Decremented(remaining) => {
                debug!("Tick: {} seconds left", remaining);
                self.send_update(&countdown);
                true
            }
            TickOutcome::Finished(event) => {
                info!("Countdown reached zero");
                Self::disarm(&mut countdown);
                self.record(&event);
                self.publish(&mut countdown, event, Some(Cue::Finish));
                false
            }
        }
    }

    /// Cancel any pending tick. Used on process exit.
    pub fn shutdown(&self) {
        let mut countdown = self.lock();
        Self::disarm(&mut countdown);
        debug!("Tick schedule cancelled for shutdown");
    }

    fn finish_locked(&self, countdown: &mut Countdown) {
        Self::disarm(countdown);
        let event = countdown.engine.finish();
        info!("Cycle finished");
        self.record(&event);
        self.publish(countdown, event, Some(Cue::Finish));
    }

    fn after_duration_set(self: &Arc<Self>, countdown: &mut Countdown, event: TimerEvent) {
        info!("Cycle length set to {} seconds", countdown.engine.configured_seconds());
        if countdown.engine.status().is_running() {
            // Restart the schedule so the first tick lands a full second later
            Self::disarm(countdown);
            self.arm(countdown);
        }
        self.publish(countdown, event, None);
    }

    fn record(&self, event: &TimerEvent) {
        if let TimerEvent::Finished { label } = event {
            if let Err(e) = self.history.append(HistoryEntry::now(label.clone())) {
                error!("Failed to record finished cycle: {}", e);
            }
        }
    }

    fn arm(self: &Arc<Self>, countdown: &mut Countdown) {
        countdown.generation += 1;
        let generation = countdown.generation;
        countdown.ticker = Some(tokio::spawn(tick_task(Arc::clone(self), generation)));
    }

    fn disarm(countdown: &mut Countdown) {
        countdown.generation += 1;
        if let Some(ticker) = countdown.ticker.take() {
            ticker.abort();
        }
    }

    fn publish(&self, countdown: &mut Countdown, event: TimerEvent, cue: Option<Cue>) {
        countdown.last_event = Some(event.clone());
        countdown.last_event_time = Some(Utc::now());
        self.send_update(countdown);

        if let Err(e) = self.event_tx.send(event) {
            debug!("No listeners for timer event: {}", e);
        }
        if let Some(cue) = cue {
            self.sound.play(cue);
        }
    }

    fn send_update(&self, countdown: &Countdown) {
        if let Err(e) = self.timer_update_tx.send(countdown.snapshot()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Countdown> {
        self.countdown.lock().unwrap_or_else(|poisoned| {
            warn!("Timer lock was poisoned, continuing with last state");
            poisoned.into_inner()
        })
    }
}
