//! Main application state management

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{services::Durations, tasks::spawn_countdown};

use super::timer_state::{Mode, TimerState};

/// Serializable read view of the timer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub is_running: bool,
    pub session_count: u64,
    pub break_count: u64,
}

impl TimerSnapshot {
    fn of(timer: &TimerState) -> Self {
        Self {
            mode: timer.mode(),
            remaining_seconds: timer.remaining_seconds(),
            is_running: timer.is_running(),
            session_count: timer.session_count(),
            break_count: timer.break_count(),
        }
    }
}

/// Outcome of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Countdown is still going
    Counting,
    /// Countdown reached zero and the phase advanced
    Advanced,
    /// The tick belonged to a cancelled countdown and changed nothing
    Cancelled,
}

/// Main application state that owns the timer machine and its countdown task
#[derive(Debug)]
pub struct AppState {
    /// The focus timer state machine
    timer: Mutex<TimerState>,
    /// Handle of the running countdown task, if any
    countdown_task: Mutex<Option<JoinHandle<()>>>,
    /// Epoch stamp for countdown cancellation; ticks from older epochs are dead
    tick_epoch: AtomicU64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState with the timer machine in its initial work phase
    pub fn new(port: u16, host: String, durations: Durations) -> Self {
        let timer = TimerState::new(durations);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::of(&timer));

        Self {
            timer: Mutex::new(timer),
            countdown_task: Mutex::new(None),
            tick_epoch: AtomicU64::new(0),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a mutation to the timer state and notify watchers
    pub fn update_timer<F>(&self, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerState),
    {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        updater(&mut timer);
        let snapshot = TimerSnapshot::of(&timer);
        drop(timer); // Release the lock early

        self.record_action(action);
        self.notify(snapshot.clone());

        Ok(snapshot)
    }

    /// Start the countdown for the current phase. No-op when already running.
    pub fn start(self: Arc<Self>) -> Result<TimerSnapshot, String> {
        {
            let mut timer = self
                .timer
                .lock()
                .map_err(|e| format!("Failed to lock timer state: {}", e))?;
            if !timer.start() {
                debug!("Start requested while already running, ignoring");
                return Ok(TimerSnapshot::of(&timer));
            }
        }

        // Replace any previous countdown task before registering a new one
        let epoch = self.tick_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let task = spawn_countdown(Arc::clone(&self), epoch);
        if let Ok(mut slot) = self.countdown_task.lock() {
            if let Some(previous) = slot.replace(task) {
                previous.abort();
            }
        }

        info!("Countdown started");
        self.record_action("start");
        let snapshot = self.snapshot()?;
        self.notify(snapshot.clone());
        Ok(snapshot)
    }

    /// Stop the countdown. Idempotent.
    pub fn stop(&self) -> Result<TimerSnapshot, String> {
        self.cancel_countdown();
        self.update_timer("stop", |timer| timer.stop())
    }

    /// Stop the countdown if running, start it otherwise
    pub fn toggle(self: Arc<Self>) -> Result<TimerSnapshot, String> {
        if self.snapshot()?.is_running {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Force the transition the countdown would eventually force
    pub fn skip(&self) -> Result<TimerSnapshot, String> {
        self.cancel_countdown();
        self.update_timer("skip", |timer| timer.advance())
    }

    /// Jump directly to the given phase without touching the counters
    pub fn set_mode(&self, mode: Mode) -> Result<TimerSnapshot, String> {
        info!("Setting timer mode to {}", mode);
        self.cancel_countdown();
        self.update_timer(&format!("mode:{}", mode), |timer| timer.set_mode(mode))
    }

    /// Reset the work session counter; leaves the phase and clock alone
    pub fn reset_session_count(&self) -> Result<TimerSnapshot, String> {
        self.update_timer("reset-session", |timer| timer.reset_session_count())
    }

    /// Apply one countdown tick for the given epoch.
    ///
    /// A tick whose epoch is stale observes nothing and mutates nothing;
    /// this is what keeps a cancelled countdown from racing a queued tick.
    pub(crate) fn apply_tick(&self, epoch: u64) -> Result<TickOutcome, String> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if self.tick_epoch.load(Ordering::SeqCst) != epoch {
            return Ok(TickOutcome::Cancelled);
        }

        let advanced = timer.tick();
        let snapshot = TimerSnapshot::of(&timer);
        drop(timer);

        self.notify(snapshot);

        Ok(if advanced {
            TickOutcome::Advanced
        } else {
            TickOutcome::Counting
        })
    }

    /// Get a read view of the current timer state
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer
            .lock()
            .map(|timer| TimerSnapshot::of(&timer))
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Get the durations the machine was constructed with
    pub fn durations(&self) -> Result<Durations, String> {
        self.timer
            .lock()
            .map(|timer| timer.durations())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Invalidate the countdown task so no queued tick can mutate state
    fn cancel_countdown(&self) {
        self.tick_epoch.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut task) = self.countdown_task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn notify(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            20673,
            "127.0.0.1".to_string(),
            Durations::default(),
        ))
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let state = test_state();
        let first = state.clone().start().unwrap();
        let second = state.clone().start().unwrap();
        assert!(first.is_running);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let state = test_state();
        state.clone().start().unwrap();
        let first = state.stop().unwrap();
        let second = state.stop().unwrap();
        assert!(!first.is_running);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn ticks_from_a_cancelled_countdown_change_nothing() {
        let state = test_state();
        state.clone().start().unwrap();
        let epoch = state.tick_epoch.load(Ordering::SeqCst);
        state.stop().unwrap();
        let before = state.snapshot().unwrap();

        let outcome = state.apply_tick(epoch).unwrap();

        assert_eq!(outcome, TickOutcome::Cancelled);
        assert_eq!(state.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn live_ticks_count_down() {
        let state = test_state();
        state.clone().start().unwrap();
        let epoch = state.tick_epoch.load(Ordering::SeqCst);

        let outcome = state.apply_tick(epoch).unwrap();

        assert_eq!(outcome, TickOutcome::Counting);
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.remaining_seconds, 25 * 60 - 1);
        assert!(snapshot.is_running);
    }

    #[tokio::test]
    async fn skip_cancels_countdown_and_advances() {
        let state = test_state();
        state.clone().start().unwrap();
        let epoch = state.tick_epoch.load(Ordering::SeqCst);

        let snapshot = state.skip().unwrap();

        assert_eq!(snapshot.mode, Mode::ShortBreak);
        assert_eq!(snapshot.remaining_seconds, 5 * 60);
        assert!(!snapshot.is_running);
        assert_eq!(state.apply_tick(epoch).unwrap(), TickOutcome::Cancelled);
    }

    #[tokio::test]
    async fn toggle_flips_running_state() {
        let state = test_state();
        let started = state.clone().toggle().unwrap();
        assert!(started.is_running);
        let stopped = state.clone().toggle().unwrap();
        assert!(!stopped.is_running);
    }

    #[tokio::test]
    async fn forced_mode_changes_leave_counters_alone() {
        let state = test_state();
        state.skip().unwrap(); // Work -> ShortBreak
        state.skip().unwrap(); // ShortBreak -> Work, counters move
        let before = state.snapshot().unwrap();

        let after = state.set_mode(Mode::LongBreak).unwrap();

        assert_eq!(after.session_count, before.session_count);
        assert_eq!(after.break_count, before.break_count);
        assert_eq!(after.remaining_seconds, 15 * 60);
        assert!(!after.is_running);
    }

    #[tokio::test]
    async fn reset_session_count_only_touches_sessions() {
        let state = test_state();
        state.skip().unwrap();
        state.skip().unwrap(); // back in Work with session 2, one break done

        let snapshot = state.reset_session_count().unwrap();

        assert_eq!(snapshot.session_count, 1);
        assert_eq!(snapshot.break_count, 1);
        assert_eq!(snapshot.mode, Mode::Work);
    }

    #[tokio::test]
    async fn watchers_see_updates() {
        let state = test_state();
        let rx = state.timer_update_tx.subscribe();

        state.skip().unwrap();

        let seen = rx.borrow().clone();
        assert_eq!(seen.mode, Mode::ShortBreak);
    }
}
