//! Timer state machine.
//!
//! The timer counts whole seconds. It does not use internal threads - the
//! caller invokes `tick()` once per elapsed second while it is running
//! (see [`super::Ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//! (mode, paused) -> start -> (mode, running) -> pause/reset -> (mode, paused)
//!                                  |
//!                                  +-> tick to 0 -> (mode, paused, 00:00)
//! ```
//!
//! Selecting a mode always lands in the paused state with a full countdown.
//! Completion does not advance to another mode.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::settings::TimerDurations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(TimerMode::Focus),
            "short" | "shortbreak" | "short-break" => Ok(TimerMode::ShortBreak),
            "long" | "longbreak" | "long-break" => Ok(TimerMode::LongBreak),
            _ => Err(format!("unknown mode '{s}' (expected focus, short or long)")),
        }
    }
}

/// Transient countdown state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u32,
    pub is_running: bool,
}

/// Countdown for the active mode.
#[derive(Debug, Clone)]
pub struct Timer {
    durations: TimerDurations,
    state: TimerState,
}

impl Timer {
    /// Create a paused timer in focus mode with a full countdown.
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            durations,
            state: TimerState {
                mode: TimerMode::Focus,
                remaining_seconds: durations.focus,
                is_running: false,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    /// Configured length of the current mode.
    pub fn total_seconds(&self) -> u32 {
        self.durations.get(self.state.mode)
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        1.0 - (f64::from(self.state.remaining_seconds) / f64::from(total))
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_time(self.state.remaining_seconds)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            total_seconds: self.total_seconds(),
            is_running: self.state.is_running,
            display: self.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn select_mode(&mut self, mode: TimerMode) -> Option<Event> {
        self.state.mode = mode;
        self.state.is_running = false;
        self.state.remaining_seconds = self.durations.get(mode);
        tracing::debug!(%mode, "timer mode selected");
        Some(Event::ModeSelected {
            mode,
            duration_secs: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running || self.state.remaining_seconds == 0 {
            return None;
        }
        self.state.is_running = true;
        tracing::debug!(mode = %self.state.mode, remaining = self.state.remaining_seconds, "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        tracing::debug!(remaining = self.state.remaining_seconds, "timer paused");
        Some(Event::TimerPaused {
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state.is_running = false;
        self.state.remaining_seconds = self.total_seconds();
        Some(Event::TimerReset {
            mode: self.state.mode,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `Some(Event::TimerCompleted)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerCompleted {
            mode: self.state.mode,
            duration_secs: self.total_seconds(),
            at: Utc::now(),
        })
    }

    /// Adopt new durations. If the current mode's length changed the
    /// countdown restarts from the new length, paused.
    pub fn set_durations(&mut self, durations: TimerDurations) -> Option<Event> {
        let mode = self.state.mode;
        let changed = durations.get(mode) != self.durations.get(mode);
        self.durations = durations;
        if changed {
            self.reset()
        } else {
            None
        }
    }
}

/// Render `seconds` as zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
