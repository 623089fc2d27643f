//! One-second tick schedule

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::state::AppState;

/// Time between two ticks of a running countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drive ticks for the schedule `generation` until the state says stop.
///
/// The task is aborted by the state on pause, reset and finish; the generation
/// check in [`AppState::tick`] discards a tick that raced with cancellation.
pub async fn tick_task(state: Arc<AppState>, generation: u64) {
    debug!("Tick schedule {} armed", generation);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if !state.tick(generation) {
            break;
        }
    }

    debug!("Tick schedule {} stopped", generation);
}
