//! Publishers that deliver snapshots to a live activity surface

use std::{
    collections::HashSet,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};
use thiserror::Error;
use tracing::{debug, info};

use super::{ActivityAttributes, ActivitySnapshot};

/// Identifier handed out by the surface when an activity is requested
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityId(pub String);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How long an ended activity stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalPolicy {
    /// Remove from the surface as soon as it ends
    Immediate,
}

/// Live activity publishing errors. None of them affect engine state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("live activities are disabled")]
    Disabled,

    #[error("surface rejected the request: {0}")]
    Rejected(String),

    #[error("unknown activity {0}")]
    UnknownActivity(ActivityId),
}

/// A live activity surface
pub trait LiveActivityPublisher: Send + Sync {
    /// Whether the surface accepts activities at all
    fn is_enabled(&self) -> bool;

    /// Show a new activity
    fn request(&self, attributes: &ActivityAttributes, snapshot: &ActivitySnapshot) -> Result<ActivityId, PublishError>;

    /// Replace the dynamic state of a shown activity
    fn update(&self, id: &ActivityId, snapshot: &ActivitySnapshot) -> Result<(), PublishError>;

    /// Tear down a shown activity
    fn end(&self, id: &ActivityId, snapshot: &ActivitySnapshot, dismissal: DismissalPolicy) -> Result<(), PublishError>;
}

/// Publisher that writes every snapshot to the log as JSON
#[derive(Debug, Default)]
pub struct LogPublisher {
    next_id: AtomicU64,
    active: Mutex<HashSet<ActivityId>>,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(snapshot: &ActivitySnapshot) -> String {
        serde_json::to_string(snapshot).unwrap_or_else(|e| format!("<unserializable: {}>", e))
    }

    fn ensure_active(&self, id: &ActivityId) -> Result<(), PublishError> {
        let active = self.active.lock()
            .map_err(|e| PublishError::Rejected(format!("activity registry poisoned: {}", e)))?;
        if active.contains(id) {
            Ok(())
        } else {
            Err(PublishError::UnknownActivity(id.clone()))
        }
    }
}

impl LiveActivityPublisher for LogPublisher {
    fn is_enabled(&self) -> bool {
        true
    }

    fn request(&self, attributes: &ActivityAttributes, snapshot: &ActivitySnapshot) -> Result<ActivityId, PublishError> {
        let id = ActivityId(format!("activity-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1));
        self.active.lock()
            .map_err(|e| PublishError::Rejected(format!("activity registry poisoned: {}", e)))?
            .insert(id.clone());
        info!("Live activity {} started for '{}': {}", id, attributes.timer_name, Self::render(snapshot));
        Ok(id)
    }

    fn update(&self, id: &ActivityId, snapshot: &ActivitySnapshot) -> Result<(), PublishError> {
        self.ensure_active(id)?;
        debug!("Live activity {} updated: {}", id, Self::render(snapshot));
        Ok(())
    }

    fn end(&self, id: &ActivityId, snapshot: &ActivitySnapshot, dismissal: DismissalPolicy) -> Result<(), PublishError> {
        let removed = self.active.lock()
            .map_err(|e| PublishError::Rejected(format!("activity registry poisoned: {}", e)))?
            .remove(id);
        if !removed {
            return Err(PublishError::UnknownActivity(id.clone()));
        }
        info!("Live activity {} ended ({:?}): {}", id, dismissal, Self::render(snapshot));
        Ok(())
    }
}

/// Publisher for a surface that has live activities turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPublisher;

impl LiveActivityPublisher for DisabledPublisher {
    fn is_enabled(&self) -> bool {
        false
    }

    fn request(&self, _: &ActivityAttributes, _: &ActivitySnapshot) -> Result<ActivityId, PublishError> {
        Err(PublishError::Disabled)
    }

    fn update(&self, _: &ActivityId, _: &ActivitySnapshot) -> Result<(), PublishError> {
        Err(PublishError::Disabled)
    }

    fn end(&self, _: &ActivityId, _: &ActivitySnapshot, _: DismissalPolicy) -> Result<(), PublishError> {
        Err(PublishError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;

    fn snapshot() -> ActivitySnapshot {
        ActivitySnapshot::new(DateTime::<Utc>::UNIX_EPOCH, true, TimeDelta::zero())
    }

    #[test]
    fn log_publisher_tracks_activity_lifecycle() {
        let publisher = LogPublisher::new();
        let attributes = ActivityAttributes::new("Stopwatch");

        let first = publisher.request(&attributes, &snapshot()).unwrap();
        let second = publisher.request(&attributes, &snapshot()).unwrap();
        assert_ne!(first, second);

        publisher.update(&first, &snapshot()).unwrap();
        publisher.end(&first, &snapshot(), DismissalPolicy::Immediate).unwrap();

        assert_eq!(
            publisher.update(&first, &snapshot()),
            Err(PublishError::UnknownActivity(first.clone()))
        );
        assert_eq!(
            publisher.end(&first, &snapshot(), DismissalPolicy::Immediate),
            Err(PublishError::UnknownActivity(first))
        );
    }

    #[test]
    fn disabled_publisher_declines_everything() {
        let publisher = DisabledPublisher;
        let id = ActivityId("activity-1".to_string());

        assert!(!publisher.is_enabled());
        assert_eq!(
            publisher.request(&ActivityAttributes::new("Clock"), &snapshot()),
            Err(PublishError::Disabled)
        );
        assert_eq!(publisher.update(&id, &snapshot()), Err(PublishError::Disabled));
        assert_eq!(
            publisher.end(&id, &snapshot(), DismissalPolicy::Immediate),
            Err(PublishError::Disabled)
        );
    }
}
