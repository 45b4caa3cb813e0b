//! Focus timer state machine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::services::Durations;

/// Phase of the focus cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Wire name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short-break",
            Mode::LongBreak => "long-break",
        }
    }

    /// Look up a phase by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "work" => Some(Mode::Work),
            "short-break" => Some(Mode::ShortBreak),
            "long-break" => Some(Mode::LongBreak),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Focus timer state machine - current phase, countdown, and session accounting.
///
/// All mode changes funnel through [`TimerState::set_mode`], which stops the
/// clock and reloads the full duration for the new phase. The counters move
/// only in [`TimerState::advance`], never on forced jumps.
#[derive(Debug, Clone)]
pub struct TimerState {
    mode: Mode,
    remaining_seconds: u64,
    is_running: bool,
    session_count: u64,
    break_count: u64,
    durations: Durations,
}

impl TimerState {
    /// Create a fresh machine in the work phase with the clock stopped
    pub fn new(durations: Durations) -> Self {
        Self {
            mode: Mode::Work,
            remaining_seconds: durations.minutes_for(Mode::Work) * 60,
            is_running: false,
            session_count: 1,
            break_count: 0,
            durations,
        }
    }

    /// Current phase
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Seconds left in the current phase
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Whether the countdown is ticking
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Work phases started, including the current one
    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    /// Short breaks completed since the last long break
    pub fn break_count(&self) -> u64 {
        self.break_count
    }

    /// The durations the machine was constructed with
    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Mark the countdown as running. Returns false if it already was.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Halt the countdown. Idempotent.
    pub fn stop(&mut self) {
        self.is_running = false;
    }

    /// Force the given phase. Stops the clock and reloads the full duration;
    /// never touches the session or break counters.
    pub fn set_mode(&mut self, mode: Mode) {
        self.is_running = false;
        self.mode = mode;
        self.remaining_seconds = self.durations.minutes_for(mode) * 60;
    }

    /// Advance the countdown by one second.
    ///
    /// When the countdown reaches zero the phase transition runs and the
    /// clock stops; returns true in that case. Does nothing while stopped.
    pub fn tick(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.advance();
            return true;
        }
        false
    }

    /// Move to the next phase of the cycle, as countdown expiry would.
    ///
    /// Leaving work picks the break kind from the completed short-break
    /// count; leaving a break updates that count before work resumes, so the
    /// next work expiry sees it.
    pub fn advance(&mut self) {
        self.is_running = false;

        if self.mode == Mode::Work {
            if self.break_count >= self.durations.long_break_interval {
                self.set_mode(Mode::LongBreak);
            } else {
                self.set_mode(Mode::ShortBreak);
            }
            return;
        }

        if self.mode == Mode::ShortBreak {
            self.break_count += 1;
        } else if self.mode == Mode::LongBreak {
            self.break_count = 0;
        }

        self.set_mode(Mode::Work);
        self.session_count += 1;
    }

    /// Reset the work session counter to 1
    pub fn reset_session_count(&mut self) {
        self.session_count = 1;
    }
}
