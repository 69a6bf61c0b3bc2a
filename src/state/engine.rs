//! Elapsed-time state engine
//!
//! The engine is a plain mutable state holder with a single logical owner.
//! It never schedules ticks and never talks to the live activity surface;
//! every action reports the transition it caused so the owner can notify
//! observers.

use std::fmt;

use chrono::{DateTime, Local, TimeDelta, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    clock::{Clock, SystemClock},
    format::{format_elapsed, format_wall_clock},
    TimerState,
};
use crate::activity::ActivitySnapshot;

/// Selects how the engine renders its display string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Accumulated running time as `HH:MM:SS`
    #[default]
    Stopwatch,
    /// Current local wall time as `HH:MM:SS`; running only gates refresh
    Clock,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Stopwatch => write!(f, "stopwatch"),
            DisplayMode::Clock => write!(f, "clock"),
        }
    }
}

/// State change emitted by an engine action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Started,
    Paused,
    Resumed,
    Reset,
}

impl Transition {
    /// Action name used for last-action tracking
    pub fn action(&self) -> &'static str {
        match self {
            Transition::Started => "start",
            Transition::Paused => "pause",
            Transition::Resumed => "resume",
            Transition::Reset => "reset",
        }
    }
}

/// Stopwatch engine over a pluggable clock
#[derive(Clone)]
pub struct ElapsedTimeEngine<C = SystemClock> {
    clock: C,
    mode: DisplayMode,
    state: TimerState,
}

impl<C> fmt::Debug for ElapsedTimeEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElapsedTimeEngine")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C: Clock> ElapsedTimeEngine<C> {
    /// Create a zeroed engine reading the given clock
    pub fn with_clock(clock: C, mode: DisplayMode) -> Self {
        Self {
            clock,
            mode,
            state: TimerState::new(),
        }
    }

    /// Current instant according to the engine's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn accumulated(&self) -> TimeDelta {
        self.state.accumulated()
    }

    /// Begin accumulating. No-op while already running.
    pub fn start(&mut self) -> Option<Transition> {
        if self.state.is_running() {
            debug!("start ignored, timer already running");
            return None;
        }
        let now = self.clock.now();
        self.state.begin(now);
        info!("Timer started at {}", now);
        Some(Transition::Started)
    }

    /// Stop accumulating and fold the running interval in. No-op while stopped.
    pub fn pause(&mut self) -> Option<Transition> {
        if !self.state.is_running() {
            debug!("pause ignored, timer not running");
            return None;
        }
        let now = self.clock.now();
        self.state.settle(now);
        info!("Timer paused, accumulated {}", format_elapsed(self.state.accumulated()));
        Some(Transition::Paused)
    }

    /// Continue accumulating after a pause.
    ///
    /// Behaves exactly like [`start`](Self::start); the transition is reported
    /// as `Resumed` when there is time to resume from.
    pub fn resume(&mut self) -> Option<Transition> {
        let resuming = self.state.accumulated() > TimeDelta::zero();
        self.start().map(|transition| {
            if resuming {
                Transition::Resumed
            } else {
                transition
            }
        })
    }

    /// Stop if running and clear all accumulated time. Always emits `Reset`
    /// and never a separate `Paused`.
    pub fn reset(&mut self) -> Transition {
        if self.state.is_running() {
            let now = self.clock.now();
            self.state.settle(now);
        }
        self.state.clear();
        info!("Timer reset");
        Transition::Reset
    }

    /// Elapsed duration at `now`, never negative
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        self.state.elapsed(now)
    }

    /// Elapsed duration at `now` as `HH:MM:SS`
    pub fn formatted_elapsed(&self, now: DateTime<Utc>) -> String {
        format_elapsed(self.elapsed(now))
    }

    /// `now` as local wall time `HH:MM:SS`
    pub fn formatted_wall_clock(&self, now: DateTime<Utc>) -> String {
        format_wall_clock(&now.with_timezone(&Local))
    }

    /// Display string for the configured mode
    pub fn display(&self, now: DateTime<Utc>) -> String {
        match self.mode {
            DisplayMode::Stopwatch => self.formatted_elapsed(now),
            DisplayMode::Clock => self.formatted_wall_clock(now),
        }
    }

    /// Snapshot for the live activity surface
    pub fn snapshot(&self, now: DateTime<Utc>) -> ActivitySnapshot {
        let reference_time = match self.state.started_at() {
            Some(started_at) if self.state.is_running() => started_at,
            _ => now,
        };
        ActivitySnapshot::new(reference_time, self.state.is_running(), self.state.accumulated())
    }

    pub fn can_start(&self) -> bool {
        !self.state.is_running()
    }

    pub fn can_pause(&self) -> bool {
        self.state.is_running()
    }

    /// Reset is offered once there is anything to clear
    pub fn can_reset(&self) -> bool {
        self.state.is_running() || self.state.accumulated() > TimeDelta::zero()
    }
}
