//! Live activity module
//!
//! This module mirrors engine state onto an externally rendered surface
//! (lock screen, persistent indicator). The surface observes the engine and
//! never owns it.

pub mod attributes;
pub mod live;
pub mod publisher;

// Re-export main types
pub use attributes::{ActivityAttributes, ActivitySnapshot};
pub use live::LiveActivity;
pub use publisher::{
    ActivityId, DisabledPublisher, DismissalPolicy, LiveActivityPublisher, LogPublisher, PublishError,
};
