//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod display_render;
pub mod refresh_ticker;

// Re-export main functions
pub use display_render::render_display_task;
pub use refresh_ticker::refresh_ticker_task;
