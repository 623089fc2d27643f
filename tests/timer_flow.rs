//! End-to-end timer behaviour with a paused tokio clock

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use focus_timer::{
    history::{HistoryEntry, HistoryStore},
    services::{Cue, SoundCue},
    state::{AppState, TimerEngine, TimerEvent, TimerStatus},
    TimerError,
};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingPlayer {
    played: Mutex<Vec<Cue>>,
}

impl RecordingPlayer {
    fn cues(&self) -> Vec<Cue> {
        self.played.lock().unwrap().clone()
    }
}

impl SoundCue for RecordingPlayer {
    fn play(&self, cue: Cue) {
        self.played.lock().unwrap().push(cue);
    }
}

struct Harness {
    state: Arc<AppState>,
    player: Arc<RecordingPlayer>,
    history: HistoryStore,
    _dir: TempDir,
}

fn harness() -> Harness {
    harness_with(TimerEngine::default())
}

fn harness_with(engine: TimerEngine) -> Harness {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db").join("history.json");
    let player = Arc::new(RecordingPlayer::default());
    let state = Arc::new(AppState::new(
        engine,
        HistoryStore::new(&path),
        Arc::clone(&player) as Arc<dyn SoundCue>,
    ));
    Harness {
        state,
        player,
        history: HistoryStore::new(path),
        _dir: dir,
    }
}

async fn wait(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[tokio::test(start_paused = true)]
async fn three_ticks_after_start() {
    let h = harness();

    h.state.start();
    wait(3_500).await;

    let timer = h.state.snapshot();
    assert_eq!(timer.remaining_seconds, timer.configured_seconds - 3);
    assert_eq!(timer.status, TimerStatus::Running);
    assert_eq!(h.player.cues(), vec![Cue::Start]);
}

#[tokio::test(start_paused = true)]
async fn start_twice_keeps_a_single_schedule() {
    let h = harness();

    h.state.start();
    h.state.start();
    wait(2_500).await;

    assert_eq!(h.state.snapshot().remaining_seconds, 1500 - 2);
    assert_eq!(h.player.cues(), vec![Cue::Start]);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_ticks_and_is_idempotent() {
    let h = harness();

    h.state.start();
    wait(2_500).await;
    h.state.pause();
    let once = h.state.snapshot();
    h.state.pause();
    wait(5_000).await;

    let twice = h.state.snapshot();
    assert_eq!(twice.remaining_seconds, 1500 - 2);
    assert_eq!(twice.remaining_seconds, once.remaining_seconds);
    assert_eq!(twice.status, TimerStatus::Paused);
    assert_eq!(h.player.cues(), vec![Cue::Start, Cue::Pause, Cue::Pause]);
}

#[tokio::test(start_paused = true)]
async fn resume_after_pause_continues_from_remaining() {
    let h = harness();

    h.state.start();
    wait(1_500).await;
    h.state.pause();
    wait(10_000).await;
    h.state.start();
    wait(2_500).await;

    assert_eq!(h.state.snapshot().remaining_seconds, 1500 - 3);
}

#[tokio::test(start_paused = true)]
async fn set_duration_start_reset() {
    let h = harness();

    h.state.set_duration(25).unwrap();
    h.state.start();
    wait(4_500).await;
    h.state.reset();
    wait(3_000).await;

    let timer = h.state.snapshot();
    assert_eq!(timer.remaining_seconds, 1500);
    assert_eq!(timer.status, TimerStatus::Idle);
    assert_eq!(h.player.cues(), vec![Cue::Start, Cue::Reset]);
}

#[tokio::test(start_paused = true)]
async fn countdown_reaching_zero_finishes_and_records() {
    let h = harness_with(TimerEngine::with_minutes(1).unwrap());
    let mut events = h.state.subscribe_events();

    h.state.start();
    // 60 ticks to reach 00:00, one more to finish
    wait(61_500).await;

    let timer = h.state.snapshot();
    assert_eq!(timer.status, TimerStatus::Idle);
    assert_eq!(timer.remaining_seconds, 60);

    let entries = h.history.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration_label, "00:00");
    assert_eq!(h.player.cues(), vec![Cue::Start, Cue::Finish]);

    assert_eq!(events.recv().await.unwrap(), TimerEvent::Started);
    assert_eq!(
        events.recv().await.unwrap(),
        TimerEvent::Finished { label: "00:00".to_string() }
    );

    // The schedule is gone once finished
    wait(5_000).await;
    assert_eq!(h.state.snapshot().remaining_seconds, 60);
}

#[tokio::test(start_paused = true)]
async fn manual_finish_records_time_left() {
    let h = harness();

    h.state.start();
    wait(10_500).await;
    let timer = h.state.finish();

    assert_eq!(timer.status, TimerStatus::Idle);
    assert_eq!(timer.remaining_seconds, 1500);
    let entries = h.history.load().unwrap();
    assert_eq!(entries.last().unwrap().duration_label, "24:50");

    wait(3_000).await;
    assert_eq!(h.state.snapshot().remaining_seconds, 1500);
}

#[tokio::test(start_paused = true)]
async fn set_duration_while_running_restarts_countdown() {
    let h = harness();

    h.state.start();
    wait(5_500).await;
    h.state.set_duration(90).unwrap();
    assert_eq!(h.state.snapshot().display(), "90:00");
    wait(2_500).await;

    let timer = h.state.snapshot();
    assert_eq!(timer.status, TimerStatus::Running);
    assert_eq!(timer.remaining_seconds, 5400 - 2);
}

#[tokio::test]
async fn invalid_duration_leaves_state_unchanged() {
    let h = harness();
    let before = h.state.snapshot();

    for input in ["0", "-3", "abc", "1.5", ""] {
        assert!(matches!(
            h.state.set_duration_input(input),
            Err(TimerError::InvalidDuration { .. })
        ));
    }
    assert!(h.state.set_duration(0).is_err());

    let after = h.state.snapshot();
    assert_eq!(after.remaining_seconds, before.remaining_seconds);
    assert_eq!(after.configured_seconds, before.configured_seconds);
    assert!(h.player.cues().is_empty());
}

#[tokio::test]
async fn history_read_and_clear_pass_through() {
    let h = harness();
    assert!(h.state.read_history().is_empty());

    h.state.finish();
    h.state.finish();
    assert_eq!(h.state.read_history().len(), 2);

    h.state.clear_history().unwrap();
    assert!(h.state.read_history().is_empty());
}

#[tokio::test]
async fn corrupt_history_reads_as_empty() {
    let h = harness();
    std::fs::create_dir_all(h.history.path().parent().unwrap()).unwrap();
    std::fs::write(h.history.path(), "{{{").unwrap();

    assert!(h.state.read_history().is_empty());

    // Finishing still works and starts a fresh log
    h.state.finish();
    let entries: Vec<HistoryEntry> = h.state.read_history();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration_label, "25:00");
}

#[tokio::test]
async fn watchers_see_the_latest_state() {
    let h = harness();
    let mut rx = h.state.watch_timer();

    h.state.set_duration(15).unwrap();
    rx.changed().await.unwrap();
    let timer = rx.borrow_and_update().clone();

    assert_eq!(timer.configured_seconds, 900);
    assert_eq!(timer.message().as_deref(), Some("Pomodoro set to 15 minutes."));
}

#[tokio::test(start_paused = true)]
async fn tick_from_cancelled_schedule_is_discarded() {
    let h = harness();

    // Schedule 1 armed, disarmed by pause, schedule 3 armed by the restart
    h.state.start();
    h.state.pause();
    h.state.start();

    assert!(!h.state.tick(1));
    let timer = h.state.snapshot();
    assert_eq!(timer.remaining_seconds, 1500);
    assert_eq!(timer.status, TimerStatus::Running);
}
