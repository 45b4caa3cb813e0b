//! Focus profile lookup

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::Mode;

/// Phase durations and long-break cadence for one focus profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Durations {
    /// Work phase length in minutes
    pub work_minutes: u64,
    /// Short break length in minutes
    pub short_break_minutes: u64,
    /// Long break length in minutes
    pub long_break_minutes: u64,
    /// Short breaks to complete before a long break is due
    pub long_break_interval: u64,
}

impl Durations {
    /// Configured length in minutes for the given phase
    pub fn minutes_for(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
        }
    }
}

/// Look up the stored focus profile for a user.
///
/// Every user currently resolves to the stock profile.
// TODO: read per-user profiles from a settings store once one exists.
pub fn lookup_durations(user_id: &str) -> Durations {
    debug!("Looking up focus profile for user '{}'", user_id);
    Durations::default()
}
