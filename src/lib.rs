//! NNTime - A stopwatch/clock session with a live activity companion surface
//!
//! This library provides the elapsed-time state engine, the session state
//! that owns it, and the host surfaces around it: an HTTP control API, a
//! refresh ticker and live activity publishing.

pub mod activity;
pub mod api;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, DisplayMode, ElapsedTimeEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
