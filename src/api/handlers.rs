//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use crate::{
    state::{AppState, Mode},
    utils::format_remaining,
};

/// Handle POST /start - begin the countdown for the current phase
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(timer) => {
            info!("Start endpoint called - countdown running in {} mode", timer.mode);
            Ok(Json(ApiResponse::running(
                "Countdown running".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - halt the countdown
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(timer) => {
            info!("Stop endpoint called - countdown stopped");
            Ok(Json(ApiResponse::paused(
                "Countdown stopped".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /toggle - stop the countdown if running, start it otherwise
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle() {
        Ok(timer) => {
            info!(
                "Toggle endpoint called - countdown now {}",
                if timer.is_running { "running" } else { "paused" }
            );
            Ok(Json(ApiResponse::of("Countdown toggled".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to toggle countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /skip - force the transition the countdown would force
pub async fn skip_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.skip() {
        Ok(timer) => {
            info!("Skip endpoint called - now in {} mode", timer.mode);
            Ok(Json(ApiResponse::paused(
                format!("Skipped to {} mode", timer.mode),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to skip phase: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mode/:mode - jump directly to a phase
pub async fn set_mode_handler(
    Path(mode): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode = match Mode::from_name(&mode) {
        Some(mode) => mode,
        None => {
            warn!("Mode endpoint called with unknown mode '{}'", mode);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.set_mode(mode) {
        Ok(timer) => {
            info!("Mode endpoint called - jumped to {} mode", mode);
            Ok(Json(ApiResponse::paused(
                format!("Mode set to {}", mode),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to set mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /session/reset - reset the work session counter
pub async fn reset_session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset_session_count() {
        Ok(timer) => {
            info!("Session reset endpoint called");
            Ok(Json(ApiResponse::of(
                "Session count reset".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to reset session count: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - return the current timer status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let durations = match state.durations() {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to get durations: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        formatted_remaining: format_remaining(timer.remaining_seconds),
        timer,
        durations,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Durations;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            20673,
            "127.0.0.1".to_string(),
            Durations::default(),
        ))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health_handler().await;
        assert_eq!(response.0.status, "ok");
    }

    #[tokio::test]
    async fn status_reports_fresh_timer() {
        let state = test_state();
        let status = status_handler(State(state)).await.unwrap().0;
        assert_eq!(status.timer.mode, Mode::Work);
        assert_eq!(status.timer.remaining_seconds, 25 * 60);
        assert_eq!(status.formatted_remaining, "25:00");
        assert_eq!(status.timer.session_count, 1);
        assert!(status.last_action.is_none());
    }

    #[tokio::test]
    async fn skip_then_status_shows_short_break() {
        let state = test_state();
        skip_handler(State(state.clone())).await.unwrap();

        let status = status_handler(State(state)).await.unwrap().0;
        assert_eq!(status.timer.mode, Mode::ShortBreak);
        assert_eq!(status.formatted_remaining, "05:00");
        assert_eq!(status.last_action.as_deref(), Some("skip"));
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let state = test_state();
        let result = set_mode_handler(Path("nap".to_string()), State(state)).await;
        assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn set_mode_jumps_without_counting() {
        let state = test_state();
        let body = set_mode_handler(Path("long-break".to_string()), State(state))
            .await
            .unwrap()
            .0;
        assert_eq!(body.timer.mode, Mode::LongBreak);
        assert_eq!(body.timer.remaining_seconds, 15 * 60);
        assert_eq!(body.timer.session_count, 1);
        assert_eq!(body.status, "paused");
    }

    #[tokio::test]
    async fn start_and_stop_flip_the_status_field() {
        let state = test_state();
        let started = start_handler(State(state.clone())).await.unwrap().0;
        assert_eq!(started.status, "running");
        assert!(started.timer.is_running);

        let stopped = stop_handler(State(state)).await.unwrap().0;
        assert_eq!(stopped.status, "paused");
        assert!(!stopped.timer.is_running);
    }
}
