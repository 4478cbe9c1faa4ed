use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The CLI prints them; the application context reacts to completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ModeSelected {
        mode: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. The timer is paused; no mode advance happens.
    TimerCompleted {
        mode: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        remaining_seconds: u32,
        total_seconds: u32,
        is_running: bool,
        display: String,
        at: DateTime<Utc>,
    },
}
