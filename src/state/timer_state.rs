//! Timer state structure and management

use chrono::{DateTime, TimeDelta, Utc};

/// Run state of a single stopwatch session.
///
/// `started_at` is present exactly when the timer is running, and
/// `accumulated` only ever holds completed running intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    running: bool,
    started_at: Option<DateTime<Utc>>,
    accumulated: TimeDelta,
}

impl TimerState {
    /// Create a zeroed, stopped timer state
    pub fn new() -> Self {
        Self {
            running: false,
            started_at: None,
            accumulated: TimeDelta::zero(),
        }
    }

    /// Check if the timer is accumulating time
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Instant the current running interval began
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Time from completed running intervals
    pub fn accumulated(&self) -> TimeDelta {
        self.accumulated
    }

    /// Open a running interval at `now`
    pub(crate) fn begin(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.running = true;
    }

    /// Close the current running interval at `now`, folding it into `accumulated`
    pub(crate) fn settle(&mut self, now: DateTime<Utc>) {
        let interval = self.current_interval(now);
        self.accumulated += interval;
        self.started_at = None;
        self.running = false;
    }

    /// Return to the zeroed state
    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    /// Length of the open running interval, clamped at zero when `now`
    /// precedes the interval start
    pub fn current_interval(&self, now: DateTime<Utc>) -> TimeDelta {
        match self.started_at {
            Some(started_at) if self.running => (now - started_at).max(TimeDelta::zero()),
            _ => TimeDelta::zero(),
        }
    }

    /// Elapsed duration as observed at `now`
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        self.accumulated + self.current_interval(now)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
