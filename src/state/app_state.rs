//! Session state: the single owner of the elapsed-time engine

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{ActivityStatus, DisplayMode, ElapsedTimeEngine, SharedClock, SystemClock, Transition};
use crate::activity::ActivitySnapshot;

/// Engine type hosted by a session
pub type SessionEngine = ElapsedTimeEngine<SharedClock>;

/// Transition together with the state it produced
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
    pub transition: Transition,
    pub snapshot: ActivitySnapshot,
    pub at: DateTime<Utc>,
}

/// Most recently rendered display string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub text: String,
    pub running: bool,
    pub rendered_at: DateTime<Utc>,
}

/// Everything the presentation layer needs to draw the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub mode: DisplayMode,
    pub running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub accumulated_seconds: i64,
    pub elapsed_seconds: i64,
    pub display: String,
    pub can_start: bool,
    pub can_pause: bool,
    pub can_reset: bool,
}

/// Main session state shared between the HTTP handlers and the ticker
#[derive(Debug)]
pub struct AppState {
    /// The engine; the mutex is the single-owner guard
    pub engine: Arc<Mutex<SessionEngine>>,
    /// Live activity availability for the advisory indicator
    pub activity_status: Arc<Mutex<ActivityStatus>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for engine transitions
    pub transition_tx: broadcast::Sender<TransitionEvent>,
    /// Channel for rendered display frames
    pub display_tx: watch::Sender<DisplayFrame>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplayFrame>,
}

impl AppState {
    /// Create a session reading the system clock
    pub fn new(mode: DisplayMode, port: u16, host: String) -> Self {
        Self::with_clock(Arc::new(SystemClock), mode, port, host)
    }

    /// Create a session reading the given clock
    pub fn with_clock(clock: SharedClock, mode: DisplayMode, port: u16, host: String) -> Self {
        let engine = ElapsedTimeEngine::with_clock(clock, mode);
        let now = engine.now();
        let initial_frame = DisplayFrame {
            text: engine.display(now),
            running: false,
            rendered_at: now,
        };
        let (transition_tx, _) = broadcast::channel(100);
        let (display_tx, display_rx) = watch::channel(initial_frame);

        Self {
            engine: Arc::new(Mutex::new(engine)),
            activity_status: Arc::new(Mutex::new(ActivityStatus::new(true))),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            transition_tx,
            display_tx,
            _display_rx: display_rx,
        }
    }

    /// Apply an engine action and notify observers if it changed anything.
    ///
    /// Returns the transition (if any) and the resulting view.
    pub fn apply<F>(&self, action: &str, updater: F) -> Result<(Option<Transition>, SessionView), String>
    where
        F: FnOnce(&mut SessionEngine) -> Option<Transition>,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let transition = updater(&mut *engine);
        let now = engine.now();
        let view = Self::build_view(&engine, now);

        let Some(transition) = transition else {
            debug!("Action {} changed nothing", action);
            return Ok((None, view));
        };
        let event = TransitionEvent {
            transition,
            snapshot: engine.snapshot(now),
            at: now,
        };

        // Everything below runs under the engine lock so observers see
        // transitions in the order the engine applied them
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(transition.action().to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(now);
        }

        self.publish_frame(DisplayFrame {
            text: view.display.clone(),
            running: view.running,
            rendered_at: now,
        });

        // Notify transition listeners (this will drive the live activity)
        if let Err(e) = self.transition_tx.send(event) {
            debug!("No transition listeners: {}", e);
        }
        drop(engine);

        Ok((Some(transition), view))
    }

    /// Start the timer
    pub fn start(&self) -> Result<(Option<Transition>, SessionView), String> {
        self.apply("start", |engine| engine.start())
    }

    /// Pause the timer
    pub fn pause(&self) -> Result<(Option<Transition>, SessionView), String> {
        self.apply("pause", |engine| engine.pause())
    }

    /// Resume the timer
    pub fn resume(&self) -> Result<(Option<Transition>, SessionView), String> {
        self.apply("resume", |engine| engine.resume())
    }

    /// Reset the timer
    pub fn reset(&self) -> Result<(Option<Transition>, SessionView), String> {
        info!("Resetting timer");
        self.apply("reset", |engine| Some(engine.reset()))
    }

    /// Current view of the timer
    pub fn get_view(&self) -> Result<SessionView, String> {
        let engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        let now = engine.now();
        Ok(Self::build_view(&engine, now))
    }

    /// Current live activity snapshot
    pub fn get_snapshot(&self) -> Result<ActivitySnapshot, String> {
        let engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        let now = engine.now();
        Ok(engine.snapshot(now))
    }

    /// Check whether the engine is running
    pub fn is_running(&self) -> Result<bool, String> {
        let engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        Ok(engine.is_running())
    }

    /// Render the display string for the current instant and publish it
    pub fn refresh_display(&self) -> Result<DisplayFrame, String> {
        let engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        let now = engine.now();
        let frame = DisplayFrame {
            text: engine.display(now),
            running: engine.is_running(),
            rendered_at: now,
        };
        // Published under the lock so a tick cannot overwrite a newer transition frame
        self.publish_frame(frame.clone());
        Ok(frame)
    }

    /// Subscribe to engine transitions
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<TransitionEvent> {
        self.transition_tx.subscribe()
    }

    /// Subscribe to rendered display frames
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayFrame> {
        self.display_tx.subscribe()
    }

    /// Get current live activity status
    pub fn get_activity_status(&self) -> Result<ActivityStatus, String> {
        self.activity_status.lock()
            .map(|status| status.clone())
            .map_err(|e| format!("Failed to lock activity status: {}", e))
    }

    /// Replace the live activity status
    pub fn update_activity_status<F>(&self, updater: F) -> Result<ActivityStatus, String>
    where
        F: FnOnce(&mut ActivityStatus),
    {
        let mut status = self.activity_status.lock()
            .map_err(|e| format!("Failed to lock activity status: {}", e))?;
        updater(&mut *status);
        Ok(status.clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn publish_frame(&self, frame: DisplayFrame) {
        if let Err(e) = self.display_tx.send(frame) {
            warn!("Failed to publish display frame: {}", e);
        }
    }

    fn build_view(engine: &SessionEngine, now: DateTime<Utc>) -> SessionView {
        SessionView {
            mode: engine.mode(),
            running: engine.is_running(),
            started_at: engine.state().started_at(),
            accumulated_seconds: engine.accumulated().num_seconds(),
            elapsed_seconds: engine.elapsed(now).num_seconds(),
            display: engine.display(now),
            can_start: engine.can_start(),
            can_pause: engine.can_pause(),
            can_reset: engine.can_reset(),
        }
    }
}
