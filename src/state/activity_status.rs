//! Live activity status as seen by the presentation layer

use serde::{Deserialize, Serialize};

/// Advisory shown when the surface cannot be used
pub const ENABLE_ADVISORY: &str = "Enable Live Activities in settings to mirror the timer";

/// Whether the live activity surface is usable and what went wrong last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStatus {
    /// The publisher accepts activities at all
    pub enabled: bool,
    /// An activity is currently shown on the surface
    pub active: bool,
    /// Most recent publish failure, cleared on the next success
    pub last_error: Option<String>,
}

impl ActivityStatus {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            active: false,
            last_error: None,
        }
    }

    /// Record a failed publish
    pub fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
    }

    /// Record a successful publish
    pub fn record_success(&mut self, active: bool) {
        self.active = active;
        if self.last_error.take().is_some() {
            tracing::info!("Live activity recovered");
        }
    }

    /// Advisory text for the presentation layer, if any
    pub fn advisory(&self) -> Option<String> {
        if !self.enabled {
            Some(ENABLE_ADVISORY.to_string())
        } else {
            self.last_error
                .as_ref()
                .map(|error| format!("Live activity unavailable: {}", error))
        }
    }
}
