//! State management module
//!
//! This module contains the elapsed-time engine and the session state that
//! owns it.

pub mod activity_status;
pub mod app_state;
pub mod clock;
pub mod engine;
pub mod format;
pub mod timer_state;

// Re-export main types
pub use activity_status::ActivityStatus;
pub use app_state::{AppState, DisplayFrame, SessionView, TransitionEvent};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use engine::{DisplayMode, ElapsedTimeEngine, Transition};
pub use timer_state::TimerState;
