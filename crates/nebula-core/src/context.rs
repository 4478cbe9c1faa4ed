//! Application context.
//!
//! [`Nebula`] is the one container for every piece of shared state: the
//! settings/stats store, the task store and the timer. The presentation
//! layer builds it once at its root and hands out borrows from there; there
//! is no global instance to reach for.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::events::Event;
use crate::settings::{SettingsPatch, SettingsStore};
use crate::storage::{KeyValueStore, SqliteStore};
use crate::task::TaskStore;
use crate::theme::{NoPalette, PaletteSink};
use crate::timer::{Timer, TimerMode};

/// Audible cue for finished countdowns. Failures are the player's to swallow.
pub trait SoundPlayer: Send {
    fn play_completion_sound(&mut self);
}

/// Player that makes no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play_completion_sound(&mut self) {}
}

pub struct Nebula {
    settings: SettingsStore,
    tasks: TaskStore,
    timer: Timer,
    sound: Box<dyn SoundPlayer>,
}

impl Nebula {
    /// Load every store from `store`, with palette changes and sounds discarded.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_outputs(store, Box::new(NoPalette), Box::new(Silent))
    }

    /// Load every store from `store`, routing palette changes and completion
    /// sounds to the given outputs.
    pub fn with_outputs(
        store: Arc<dyn KeyValueStore>,
        palette: Box<dyn PaletteSink>,
        sound: Box<dyn SoundPlayer>,
    ) -> Self {
        let settings = SettingsStore::load(Arc::clone(&store), palette);
        let tasks = TaskStore::load(store);
        let timer = Timer::new(settings.settings().timer_durations);
        Self {
            settings,
            tasks,
            timer,
            sound,
        }
    }

    /// Open the SQLite store named in `config` and load from it.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open(
        config: &Config,
        palette: Box<dyn PaletteSink>,
        sound: Box<dyn SoundPlayer>,
    ) -> Result<Self> {
        let store = SqliteStore::open(&config.storage.database)?;
        Ok(Self::with_outputs(Arc::new(store), palette, sound))
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Apply a settings patch and keep the timer's durations in step.
    ///
    /// Returns the timer event produced when the current mode's duration
    /// changed and the countdown was reset.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Option<Event> {
        if !self.settings.update_settings(patch) {
            return None;
        }
        self.timer.set_durations(self.settings.settings().timer_durations)
    }

    pub fn reset_settings(&mut self) -> Option<Event> {
        self.settings.reset_settings();
        self.timer.set_durations(self.settings.settings().timer_durations)
    }

    pub fn reset_stats(&mut self) {
        self.settings.reset_stats();
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn select_mode(&mut self, mode: TimerMode) -> Option<Event> {
        self.timer.select_mode(mode)
    }

    pub fn start(&mut self) -> Option<Event> {
        self.timer.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.timer.reset()
    }

    /// Advance the timer one second and settle a completion.
    ///
    /// A finished focus session adds the configured focus length, in
    /// minutes, to the statistics. Any finished countdown plays the
    /// completion sound when sound is enabled.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.timer.tick()?;
        if let Event::TimerCompleted { mode, duration_secs, .. } = &event {
            if *mode == TimerMode::Focus {
                let minutes = f64::from(*duration_secs) / 60.0;
                tracing::info!(minutes, "focus session completed");
                self.settings.increment_stats(minutes);
            }
            // Breaks chime too. Whether only focus should is an open product question.
            if self.settings.settings().sound_enabled {
                self.sound.play_completion_sound();
            }
        }
        Some(event)
    }
}
