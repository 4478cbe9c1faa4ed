//! User settings and cumulative focus statistics.
//!
//! Both records are persisted as JSON under [`SETTINGS_KEY`] and
//! [`STATS_KEY`]. Stored settings are merged with defaults field by field on
//! load, so records written by older versions (or hand-edited ones) keep
//! whatever is still valid and backfill the rest.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::storage::{self, KeyValueStore, SETTINGS_KEY, STATS_KEY};
use crate::theme::{self, PaletteSink, Theme};
use crate::timer::TimerMode;

pub const DEFAULT_THEME_ID: &str = "nebula";

/// Countdown length per mode, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerDurations {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            focus: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}

impl TimerDurations {
    pub fn get(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    fn all_positive(&self) -> bool {
        self.focus > 0 && self.short_break > 0 && self.long_break > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub timer_durations: TimerDurations,
    pub theme_id: String,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_durations: TimerDurations::default(),
            theme_id: DEFAULT_THEME_ID.to_string(),
            sound_enabled: true,
        }
    }
}

fn positive_secs(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .filter(|&secs| secs > 0)
        .and_then(|secs| u32::try_from(secs).ok())
}

impl Settings {
    /// Merge a stored record over the defaults.
    ///
    /// Anything that is not a JSON object yields the defaults outright.
    /// Otherwise each known field is taken from the record when it has the
    /// right type, and `timerDurations` is merged one duration at a time.
    pub fn merge_stored(stored: Option<Value>) -> Self {
        let mut settings = Self::default();
        let Some(Value::Object(map)) = stored else {
            return settings;
        };

        if let Some(id) = map.get("themeId").and_then(Value::as_str) {
            if !id.is_empty() {
                settings.theme_id = id.to_string();
            }
        }
        if let Some(enabled) = map.get("soundEnabled").and_then(Value::as_bool) {
            settings.sound_enabled = enabled;
        }
        if let Some(Value::Object(durations)) = map.get("timerDurations") {
            let d = &mut settings.timer_durations;
            if let Some(secs) = positive_secs(durations.get("focus")) {
                d.focus = secs;
            }
            if let Some(secs) = positive_secs(durations.get("shortBreak")) {
                d.short_break = secs;
            }
            if let Some(secs) = positive_secs(durations.get("longBreak")) {
                d.long_break = secs;
            }
        }
        settings
    }

    /// Shallow-merge `patch`. Returns whether anything changed.
    pub fn apply(&mut self, patch: SettingsPatch) -> bool {
        let before = self.clone();
        if let Some(durations) = patch.timer_durations {
            if durations.all_positive() {
                self.timer_durations = durations;
            } else {
                tracing::debug!(?durations, "ignoring timer durations with a zero entry");
            }
        }
        if let Some(theme_id) = patch.theme_id {
            self.theme_id = theme_id;
        }
        if let Some(enabled) = patch.sound_enabled {
            self.sound_enabled = enabled;
        }
        *self != before
    }

    /// The theme `theme_id` resolves to, or the first registered theme.
    pub fn theme(&self) -> &'static Theme {
        theme::resolve(&self.theme_id)
    }

    /// Get a value as string by dot-separated key, e.g. `timerDurations.focus`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Top-level fields to overwrite. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_durations: Option<TimerDurations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn timer_durations(mut self, durations: TimerDurations) -> Self {
        self.timer_durations = Some(durations);
        self
    }

    pub fn theme_id(mut self, id: impl Into<String>) -> Self {
        self.theme_id = Some(id.into());
        self
    }

    pub fn sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = Some(enabled);
        self
    }

    /// Build a patch that sets one dot-separated key to `value`.
    ///
    /// Nested keys such as `timerDurations.focus` produce a patch carrying
    /// the whole `timerDurations` object, since patches replace top-level
    /// fields wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// for the key's type, a duration is zero, or a theme id is not
    /// registered.
    pub fn from_path(current: &Settings, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut json =
            serde_json::to_value(current).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let top = key.split('.').next().unwrap_or_default();
        let patch = match top {
            "timerDurations" => {
                if !updated.timer_durations.all_positive() {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "durations must be greater than zero".into(),
                    });
                }
                Self::default().timer_durations(updated.timer_durations)
            }
            "themeId" => {
                if theme::lookup(&updated.theme_id).is_none() {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("no theme named '{}'", updated.theme_id),
                    });
                }
                Self::default().theme_id(updated.theme_id)
            }
            "soundEnabled" => Self::default().sound_enabled(updated.sound_enabled),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(patch)
    }
}

fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if key.is_empty() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                Value::Bool(_) => Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?;
                    Value::Number(n.into())
                }
                Value::Object(_) | Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}

/// Cumulative focus statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub sessions_completed: u64,
    pub total_minutes: f64,
}

impl Stats {
    pub fn record_session(&mut self, minutes: f64) {
        self.sessions_completed += 1;
        // NaN and negative inputs count as zero minutes.
        self.total_minutes += minutes.max(0.0);
    }
}

/// Persisted settings and statistics.
///
/// Every committed change is written through the persistence adapter, and
/// every settings change re-applies the resolved theme to the palette sink.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
    stats: Stats,
    palette: Box<dyn PaletteSink>,
}

impl SettingsStore {
    /// Load both records from `store`, backfill defaults, write the merged
    /// records back and apply the initial palette.
    pub fn load(store: Arc<dyn KeyValueStore>, palette: Box<dyn PaletteSink>) -> Self {
        let settings = Settings::merge_stored(storage::load_value(store.as_ref(), SETTINGS_KEY));
        let stats = storage::load(store.as_ref(), STATS_KEY, Stats::default());
        let mut this = Self {
            store,
            settings,
            stats,
            palette,
        };
        this.settings_changed();
        this.stats_changed();
        this
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn current_theme(&self) -> &'static Theme {
        self.settings.theme()
    }

    /// Shallow-merge `patch` into the settings. Returns whether anything changed.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> bool {
        let changed = self.settings.apply(patch);
        if changed {
            tracing::debug!(settings = ?self.settings, "settings updated");
            self.settings_changed();
        }
        changed
    }

    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        self.settings_changed();
    }

    /// Count one completed focus session of `minutes` length.
    pub fn increment_stats(&mut self, minutes: f64) {
        self.stats.record_session(minutes);
        tracing::debug!(stats = ?self.stats, "stats incremented");
        self.stats_changed();
    }

    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
        self.stats_changed();
    }

    fn settings_changed(&mut self) {
        storage::save(self.store.as_ref(), SETTINGS_KEY, &self.settings);
        self.palette.apply_palette(self.settings.theme());
    }

    fn stats_changed(&self) {
        storage::save(self.store.as_ref(), STATS_KEY, &self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::theme::NoPalette;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<&'static str>>>);

    impl PaletteSink for RecordingSink {
        fn apply_palette(&mut self, theme: &Theme) {
            self.0.lock().unwrap().push(theme.id);
        }
    }

    fn memory() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let store = memory();
        store.set(SETTINGS_KEY, "{{{ definitely not json").unwrap();
        let settings = SettingsStore::load(store, Box::new(NoPalette));
        assert_eq!(
            serde_json::to_value(settings.settings()).unwrap(),
            json!({
                "timerDurations": {"focus": 1500, "shortBreak": 300, "longBreak": 900},
                "themeId": "nebula",
                "soundEnabled": true
            })
        );
    }

    #[test]
    fn merge_backfills_missing_nested_durations() {
        let merged = Settings::merge_stored(Some(json!({
            "timerDurations": {"focus": 3000},
            "soundEnabled": false
        })));
        assert_eq!(merged.timer_durations.focus, 3000);
        assert_eq!(merged.timer_durations.short_break, 300);
        assert_eq!(merged.timer_durations.long_break, 900);
        assert!(!merged.sound_enabled);
        assert_eq!(merged.theme_id, "nebula");
    }

    #[test]
    fn merge_drops_legacy_fields_and_empty_theme() {
        let merged = Settings::merge_stored(Some(json!({
            "themeColor": "#ff00ff",
            "themeId": ""
        })));
        assert_eq!(merged, Settings::default());
    }

    #[test]
    fn merge_rejects_non_positive_or_mistyped_durations() {
        let merged = Settings::merge_stored(Some(json!({
            "timerDurations": {"focus": 0, "shortBreak": "ten", "longBreak": 1200}
        })));
        assert_eq!(merged.timer_durations.focus, 1500);
        assert_eq!(merged.timer_durations.short_break, 300);
        assert_eq!(merged.timer_durations.long_break, 1200);
    }

    #[test]
    fn non_object_record_is_default() {
        assert_eq!(Settings::merge_stored(Some(json!([1, 2]))), Settings::default());
        assert_eq!(Settings::merge_stored(None), Settings::default());
    }

    #[test]
    fn update_is_shallow() {
        let mut settings = Settings::default();
        let changed = settings.apply(SettingsPatch::default().theme_id("ocean"));
        assert!(changed);
        assert_eq!(settings.theme_id, "ocean");
        assert_eq!(settings.timer_durations, TimerDurations::default());
        assert!(settings.sound_enabled);
    }

    #[test]
    fn update_with_zero_duration_is_ignored() {
        let mut settings = Settings::default();
        let changed = settings.apply(SettingsPatch::default().timer_durations(TimerDurations {
            focus: 0,
            short_break: 60,
            long_break: 60,
        }));
        assert!(!changed);
        assert_eq!(settings.timer_durations, TimerDurations::default());
    }

    #[test]
    fn update_persists_and_applies_palette() {
        let store = memory();
        let sink = RecordingSink::default();
        let mut settings = SettingsStore::load(store.clone(), Box::new(sink.clone()));
        assert!(settings.update_settings(SettingsPatch::default().theme_id("sunset")));

        let stored: Value = serde_json::from_str(&store.get(SETTINGS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["themeId"], "sunset");
        assert_eq!(*sink.0.lock().unwrap(), vec!["nebula", "sunset"]);
    }

    #[test]
    fn unknown_theme_applies_first_palette() {
        let sink = RecordingSink::default();
        let mut settings = SettingsStore::load(memory(), Box::new(sink.clone()));
        settings.update_settings(SettingsPatch::default().theme_id("plaid"));
        assert_eq!(settings.settings().theme_id, "plaid");
        assert_eq!(settings.current_theme().id, "nebula");
        assert_eq!(sink.0.lock().unwrap().last(), Some(&"nebula"));
    }

    #[test]
    fn increment_stats_accumulates_and_persists() {
        let store = memory();
        let mut settings = SettingsStore::load(store.clone(), Box::new(NoPalette));
        settings.increment_stats(25.0);
        settings.increment_stats(0.5);
        assert_eq!(settings.stats().sessions_completed, 2);
        assert_eq!(settings.stats().total_minutes, 25.5);

        let reloaded = SettingsStore::load(store, Box::new(NoPalette));
        assert_eq!(reloaded.stats().sessions_completed, 2);
    }

    #[test]
    fn stats_backfill_missing_fields() {
        let store = memory();
        store.set(STATS_KEY, r#"{"sessionsCompleted": 4}"#).unwrap();
        let settings = SettingsStore::load(store, Box::new(NoPalette));
        assert_eq!(settings.stats().sessions_completed, 4);
        assert_eq!(settings.stats().total_minutes, 0.0);
    }

    #[test]
    fn negative_minutes_count_as_zero() {
        let mut stats = Stats::default();
        stats.record_session(-5.0);
        stats.record_session(f64::NAN);
        assert_eq!(stats.sessions_completed, 2);
        assert_eq!(stats.total_minutes, 0.0);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let settings = Settings::default();
        assert_eq!(settings.get("timerDurations.focus").as_deref(), Some("1500"));
        assert_eq!(settings.get("themeId").as_deref(), Some("nebula"));
        assert_eq!(settings.get("soundEnabled").as_deref(), Some("true"));
        assert!(settings.get("timerDurations.missing").is_none());
    }

    #[test]
    fn patch_from_nested_path_carries_full_object() {
        let patch =
            SettingsPatch::from_path(&Settings::default(), "timerDurations.shortBreak", "420").unwrap();
        assert_eq!(
            patch,
            SettingsPatch::default().timer_durations(TimerDurations {
                focus: 1500,
                short_break: 420,
                long_break: 900,
            })
        );
    }

    #[test]
    fn patch_from_path_rejects_bad_input() {
        let current = Settings::default();
        assert!(matches!(
            SettingsPatch::from_path(&current, "volume", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            SettingsPatch::from_path(&current, "soundEnabled", "loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SettingsPatch::from_path(&current, "timerDurations.focus", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SettingsPatch::from_path(&current, "themeId", "plaid"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn patch_from_path_accepts_theme_and_sound() {
        let current = Settings::default();
        assert_eq!(
            SettingsPatch::from_path(&current, "themeId", "aurora").unwrap(),
            SettingsPatch::default().theme_id("aurora")
        );
        assert_eq!(
            SettingsPatch::from_path(&current, "soundEnabled", "false").unwrap(),
            SettingsPatch::default().sound_enabled(false)
        );
    }
}
