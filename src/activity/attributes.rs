//! Data sent to the live activity surface

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Static attributes, fixed when an activity is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAttributes {
    /// Title shown on the surface
    pub timer_name: String,
}

impl ActivityAttributes {
    pub fn new(timer_name: impl Into<String>) -> Self {
        Self {
            timer_name: timer_name.into(),
        }
    }
}

/// Immutable copy of engine state for the live activity surface.
///
/// `reference_time` is the start of the running interval while running, or
/// the capture instant when stopped. The surface recomputes elapsed time
/// with [`ActivitySnapshot::elapsed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    pub reference_time: DateTime<Utc>,
    pub is_running: bool,
    /// Accumulated seconds from completed intervals
    pub paused_duration: f64,
}

impl ActivitySnapshot {
    pub fn new(reference_time: DateTime<Utc>, is_running: bool, paused_duration: TimeDelta) -> Self {
        Self {
            reference_time,
            is_running,
            paused_duration: paused_duration.num_milliseconds().max(0) as f64 / 1000.0,
        }
    }

    /// Accumulated time as a duration
    pub fn paused(&self) -> TimeDelta {
        TimeDelta::milliseconds((self.paused_duration.max(0.0) * 1000.0).round() as i64)
    }

    /// Elapsed duration at `now`, using the same clamped formula as the engine
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        if self.is_running {
            self.paused() + (now - self.reference_time).max(TimeDelta::zero())
        } else {
            self.paused()
        }
    }
}
