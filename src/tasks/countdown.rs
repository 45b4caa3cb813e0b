//! Per-second countdown background task

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome};

/// Spawn the countdown task for the given cancellation epoch
pub fn spawn_countdown(state: Arc<AppState>, epoch: u64) -> JoinHandle<()> {
    tokio::spawn(countdown_task(state, epoch))
}

/// Drive the timer down one second at a time until the phase advances or the
/// countdown is cancelled. Each tick re-checks the epoch under the state
/// lock, so a tick that raced a cancellation changes nothing.
async fn countdown_task(state: Arc<AppState>, epoch: u64) {
    debug!("Countdown task started (epoch {})", epoch);

    let mut interval = tokio::time::interval(Duration::from_secs(1));

    loop {
        interval.tick().await;

        match state.apply_tick(epoch) {
            Ok(TickOutcome::Counting) => {}
            Ok(TickOutcome::Advanced) => {
                info!("Countdown reached zero, phase advanced");
                break;
            }
            Ok(TickOutcome::Cancelled) => {
                debug!("Countdown task cancelled (epoch {})", epoch);
                break;
            }
            Err(e) => {
                error!("Failed to apply countdown tick: {}", e);
                break;
            }
        }
    }
}
