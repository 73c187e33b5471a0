//! Ring Clock - A state-managed countdown timer service
//!
//! This is the main entry point for the ring-clock application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use ring_clock::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{frame_clock_task, spawn_countdown_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ring_clock={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting ring-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, frame_rate={}fps, duration={}m{}s",
        config.host, config.port, config.frame_rate, config.minutes, config.seconds
    );

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.frame_rate,
        config.minutes,
        config.seconds,
    ));

    // Start the countdown task before anything can toggle the timer
    spawn_countdown_task(Arc::clone(&state));

    // Start the frame clock that drives the countdown
    let clock_state = Arc::clone(&state);
    tokio::spawn(async move {
        frame_clock_task(clock_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle                    - Start or pause the countdown");
    info!("  POST /reset                     - Clear the countdown and configuration");
    info!("  POST /adjust/:field/:direction  - Step minutes (1) or seconds (5) up/down");
    info!("  GET  /status                    - Current timer state and ring display values");
    info!("  GET  /health                    - Health check");

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
