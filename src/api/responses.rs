//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ActivityStatus, SessionView, Transition};

/// API response structure for timer action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Transition caused by the action, absent when nothing changed
    pub transition: Option<Transition>,
    pub timer: SessionView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(message: String, transition: Option<Transition>, timer: SessionView) -> Self {
        let status = if timer.running { "running" } else { "stopped" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            transition,
            timer,
        }
    }
}

/// Live activity section of the status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveActivityResponse {
    pub enabled: bool,
    pub active: bool,
    pub advisory: Option<String>,
}

impl From<ActivityStatus> for LiveActivityResponse {
    fn from(status: ActivityStatus) -> Self {
        Self {
            advisory: status.advisory(),
            enabled: status.enabled,
            active: status.active,
        }
    }
}

/// Full session status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: SessionView,
    pub live_activity: LiveActivityResponse,
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
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
