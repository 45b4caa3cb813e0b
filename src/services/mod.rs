//! External collaborators module
//!
//! This module contains the focus profile lookup consulted once at startup.

pub mod durations;

// Re-export main types
pub use durations::{lookup_durations, Durations};
