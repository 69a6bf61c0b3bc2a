//! NNTime - A stopwatch/clock session with a live activity companion surface
//!
//! This is the main entry point for the nntime application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use nntime::{
    activity::{ActivityAttributes, DisabledPublisher, LiveActivity, LiveActivityPublisher, LogPublisher},
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{refresh_ticker_task, render_display_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("nntime={},tower_http=info", config.log_level()))
        .init();

    info!("Starting nntime server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, mode={}, tick={}ms",
          config.host, config.port, config.mode, config.tick_interval().as_millis());

    // Create session state
    let state = Arc::new(AppState::new(config.mode, config.port, config.host.clone()));

    // Pick the live activity surface
    let publisher: Arc<dyn LiveActivityPublisher> = if config.no_live_activity {
        Arc::new(DisabledPublisher)
    } else {
        Arc::new(LogPublisher::new())
    };
    let activity = LiveActivity::new(publisher, ActivityAttributes::new(config.activity_name()), config.mode);

    // Start the refresh ticker background task
    tokio::spawn(refresh_ticker_task(Arc::clone(&state), activity, config.tick_interval()));

    if config.render {
        tokio::spawn(render_display_task(state.subscribe_display()));
    }

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start the timer");
    info!("  POST /pause  - Pause the timer");
    info!("  POST /resume - Resume the timer");
    info!("  POST /reset  - Stop and clear the timer");
    info!("  GET  /status - Check current timer and live activity status");
    info!("  GET  /health - Health check");

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
