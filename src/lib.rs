//! Tomato Clock - A state-managed HTTP server for Pomodoro focus timing
//!
//! This library provides the focus timer state machine (cyclic work/break
//! phases with session and break accounting) and the HTTP surface used to
//! drive it.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use services::{lookup_durations, Durations};
pub use state::{AppState, Mode, TimerSnapshot};
pub use utils::signals::shutdown_signal;
