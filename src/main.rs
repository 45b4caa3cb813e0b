//! Tomato Clock - A state-managed HTTP server for Pomodoro focus timing
//!
//! This is the main entry point for the tomato-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use tomato_clock::{
    api::create_router,
    config::Config,
    services::lookup_durations,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tomato_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting tomato-clock server v0.1.0");

    // One profile lookup at startup; CLI flags win over the stored profile
    let durations = config.merge_durations(lookup_durations(&config.user));
    info!(
        "Focus profile for '{}': work={}min, short break={}min, long break={}min, long break after {} short breaks",
        config.user,
        durations.work_minutes,
        durations.short_break_minutes,
        durations.long_break_minutes,
        durations.long_break_interval
    );

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), durations));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start the countdown");
    info!("  POST /stop           - Stop the countdown");
    info!("  POST /toggle         - Toggle the countdown");
    info!("  POST /skip           - Skip to the next phase");
    info!("  POST /mode/:mode     - Jump to work, short-break, or long-break");
    info!("  POST /session/reset  - Reset the session counter");
    info!("  GET  /status         - Check current phase and timer");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
