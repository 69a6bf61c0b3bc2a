//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, SessionView, Transition};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

type ActionResult = Result<(Option<Transition>, SessionView), String>;

/// Turn an action result into a response; a no-op is still a success
fn respond(action: &str, result: ActionResult, done: &str, unchanged: &str) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((Some(transition), view)) => {
            info!("{} endpoint called - {:?} at {}", action, transition, view.display);
            Ok(Json(ApiResponse::new(done.to_string(), Some(transition), view)))
        }
        Ok((None, view)) => {
            info!("{} endpoint called - nothing to do", action);
            Ok(Json(ApiResponse::new(unchanged.to_string(), None, view)))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("start", state.start(), "Timer started", "Timer already running")
}

/// Handle POST /pause - Pause the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("pause", state.pause(), "Timer paused", "Timer is not running")
}

/// Handle POST /resume - Resume the timer
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("resume", state.resume(), "Timer resumed", "Timer already running")
}

/// Handle POST /reset - Stop and clear the timer
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("reset", state.reset(), "Timer reset", "Timer already reset")
}

/// Handle GET /status - Return current session status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_view() {
        Ok(view) => view,
        Err(e) => {
            error!("Failed to get timer view: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let activity_status = match state.get_activity_status() {
        Ok(status) => status,
        Err(e) => {
            error!("Failed to get live activity status: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        live_activity: activity_status.into(),
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
