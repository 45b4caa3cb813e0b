//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{services::Durations, state::TimerSnapshot};

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response for a call that left the countdown running
    pub fn running(message: String, timer: TimerSnapshot) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Response for a call that left the countdown stopped
    pub fn paused(message: String, timer: TimerSnapshot) -> Self {
        Self::new("paused".to_string(), message, timer)
    }

    /// Response reflecting whichever state the call produced
    pub fn of(message: String, timer: TimerSnapshot) -> Self {
        if timer.is_running {
            Self::running(message, timer)
        } else {
            Self::paused(message, timer)
        }
    }
}

/// Status response with the full timer picture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub formatted_remaining: String,
    pub durations: Durations,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
        }
    }
}
