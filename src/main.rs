//! Ring Timer - A round-based interval timer daemon
//! 
//! This is the main entry point for the ring-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use ring_timer::{
    config::Config,
    services::ChannelTicker,
    state::AppState,
    api::create_router,
    tasks::{tick_driver_task, wake_up_recovery_task},
    timer::TimerEngine,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("ring_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting ring-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, warning={}s, muted={}, notifications={}",
          config.host, config.port, config.warning_threshold, config.muted, !config.no_notifications);

    // Create application state; the engine drives the tick task through this handle
    let (ticker, tick_commands) = ChannelTicker::new();
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.cue_settings(),
        Arc::new(ticker),
    ));

    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(tick_state, tick_commands).await;
    });

    let recovery_state = Arc::clone(&state);
    let (check_every, suspend_gap) = (config.recovery_interval(), config.suspend_gap());
    tokio::spawn(async move {
        wake_up_recovery_task(recovery_state, check_every, suspend_gap).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start a workout (preset or schedule)");
    info!("  POST /pause|/resume|/toggle|/stop");
    info!("  POST /restart-phase  - Restart the current phase");
    info!("  POST /skip           - Skip to the next phase");
    info!("  POST /add-time       - Add or subtract seconds");
    info!("  POST /mute           - Mute or unmute cues");
    info!("  POST /background|/foreground|/resync");
    info!("  GET  /status /presets /notifications /history /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Record an in-progress workout before exiting
    if let Err(e) = state.command("shutdown", TimerEngine::stop) {
        error!("Failed to stop timer on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
