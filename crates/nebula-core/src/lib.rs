//! # Nebula Core Library
//!
//! This library provides the core logic for Nebula, a focus timer paired
//! with an ordered task list. The `nebula` CLI binary is a thin presentation
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer**: A per-second countdown state machine; the caller drives it by
//!   invoking `tick()` once per elapsed second while it runs
//! - **Storage**: JSON blobs under fixed keys in a key-value store (SQLite
//!   on disk, or in memory for tests)
//! - **Settings**: Durations, theme and sound preferences plus cumulative
//!   focus statistics
//! - **Tasks**: Ordered task list with add/toggle/delete/reorder operations
//!
//! ## Key Components
//!
//! - [`Nebula`]: Application context owning every store and the timer
//! - [`Timer`]: Countdown state machine
//! - [`TaskStore`]: Persisted task list
//! - [`SettingsStore`]: Persisted settings and statistics
//! - [`KeyValueStore`]: Trait for persistence backends

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod settings;
pub mod storage;
pub mod task;
pub mod theme;
pub mod timer;

pub use config::Config;
pub use context::{Nebula, Silent, SoundPlayer};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use settings::{Settings, SettingsPatch, SettingsStore, Stats, TimerDurations};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use task::{Category, Task, TaskList, TaskStore};
pub use theme::{NoPalette, Palette, PaletteSink, Theme};
pub use timer::{format_time, Ticker, Timer, TimerMode, TimerState};
