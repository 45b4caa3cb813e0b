//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerSnapshot};
pub use timer_state::{Mode, TimerState};

pub(crate) use app_state::TickOutcome;
