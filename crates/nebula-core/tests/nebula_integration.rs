//! End-to-end tests for the application context over a SQLite file.
//!
//! Each test opens the store, mutates through [`Nebula`], drops it and opens
//! a fresh context on the same file, the way a restarted process would.

use std::path::Path;
use std::sync::{Arc, Mutex};

use nebula_core::storage::{SETTINGS_KEY, STATS_KEY, TASKS_KEY};
use nebula_core::{
    Category, Event, KeyValueStore, Nebula, PaletteSink, SettingsPatch, SqliteStore, Theme,
    TimerDurations, TimerMode,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn open(path: &Path) -> Nebula {
    Nebula::new(Arc::new(SqliteStore::open_at(path).unwrap()))
}

#[derive(Clone, Default)]
struct PaletteLog(Arc<Mutex<Vec<String>>>);

impl PaletteSink for PaletteLog {
    fn apply_palette(&mut self, theme: &Theme) {
        self.0.lock().unwrap().push(theme.colors.primary.to_string());
    }
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn tasks_survive_restart_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nebula.db");

    let (first, second, third) = {
        let mut app = open(&path);
        let tasks = app.tasks_mut();
        let first = tasks.add_task("Plan sprint", Category::Work).unwrap();
        let second = tasks.add_task("Call mum", Category::Personal).unwrap();
        let third = tasks.add_task("Fix prod", Category::Urgent).unwrap();
        tasks.reorder(&first, &third);
        tasks.toggle_task(&second);
        (first, second, third)
    };

    let app = open(&path);
    let ids: Vec<&str> = app.tasks().tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), third.as_str(), second.as_str()]);
    assert!(app.tasks().list().get(&second).unwrap().completed);
    assert_eq!(app.tasks().list().completed_count(), 1);
}

#[test]
fn ids_stay_unique_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nebula.db");

    let mut seen = Vec::new();
    for _ in 0..3 {
        let mut app = open(&path);
        for i in 0..5 {
            seen.push(app.tasks_mut().add_task(&format!("task {i}"), Category::Other).unwrap());
        }
    }
    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), seen.len());
}

#[test]
fn settings_and_stats_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nebula.db");

    {
        let mut app = open(&path);
        app.update_settings(
            SettingsPatch::default()
                .theme_id("ocean")
                .timer_durations(TimerDurations {
                    focus: 3,
                    short_break: 60,
                    long_break: 120,
                }),
        );
        app.start();
        for _ in 0..3 {
            app.tick();
        }
    }

    let app = open(&path);
    assert_eq!(app.settings().settings().theme_id, "ocean");
    assert_eq!(app.settings().stats().sessions_completed, 1);
    assert_eq!(app.settings().stats().total_minutes, 0.05);
    assert_eq!(app.timer().remaining_seconds(), 3);
}

#[test]
fn legacy_settings_record_is_backfilled_and_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nebula.db");
    {
        let store = SqliteStore::open_at(&path).unwrap();
        store
            .set(SETTINGS_KEY, r##"{"themeColor":"#ff00ff","timerDurations":{"focus":1200}}"##)
            .unwrap();
    }

    let app = open(&path);
    let settings = app.settings().settings();
    assert_eq!(settings.theme_id, "nebula");
    assert_eq!(settings.timer_durations.focus, 1200);
    assert_eq!(settings.timer_durations.short_break, 300);
    assert!(settings.sound_enabled);
    drop(app);

    let store = SqliteStore::open_at(&path).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&store.get(SETTINGS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "timerDurations": {"focus": 1200, "shortBreak": 300, "longBreak": 900},
            "themeId": "nebula",
            "soundEnabled": true
        })
    );
}

#[test]
fn corrupt_records_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nebula.db");
    {
        let store = SqliteStore::open_at(&path).unwrap();
        store.set(TASKS_KEY, "[{oops").unwrap();
        store.set(SETTINGS_KEY, "null").unwrap();
        store.set(STATS_KEY, "\"lots\"").unwrap();
    }

    let app = open(&path);
    assert!(app.tasks().tasks().is_empty());
    assert_eq!(app.settings().settings().timer_durations.focus, 1500);
    assert_eq!(app.settings().stats().sessions_completed, 0);
}

// ============================================================================
// Timer flow
// ============================================================================

#[test]
fn default_focus_session_counts_25_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open(&dir.path().join("nebula.db"));

    assert_eq!(app.timer().display(), "25:00");
    app.start();
    let completions = (0..1500)
        .filter_map(|_| app.tick())
        .filter(|e| matches!(e, Event::TimerCompleted { .. }))
        .count();

    assert_eq!(completions, 1);
    assert_eq!(app.timer().display(), "00:00");
    assert!(!app.timer().is_running());
    assert_eq!(app.settings().stats().sessions_completed, 1);
    assert_eq!(app.settings().stats().total_minutes, 25.0);
}

#[test]
fn select_short_break_from_running_focus() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open(&dir.path().join("nebula.db"));
    app.start();
    app.tick();
    app.select_mode(TimerMode::ShortBreak);
    assert_eq!(app.timer().remaining_seconds(), 300);
    assert!(!app.timer().is_running());
    assert_eq!(app.timer().display(), "05:00");
}

#[test]
fn palette_follows_theme_changes() {
    let log = PaletteLog::default();
    let mut app = Nebula::with_outputs(
        Arc::new(SqliteStore::open_memory().unwrap()),
        Box::new(log.clone()),
        Box::new(nebula_core::Silent),
    );
    app.update_settings(SettingsPatch::default().theme_id("aurora"));
    app.update_settings(SettingsPatch::default().theme_id("aurora"));
    app.reset_settings();

    assert_eq!(*log.0.lock().unwrap(), vec!["#a18cd1", "#43e97b", "#a18cd1"]);
}
