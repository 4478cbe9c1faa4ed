//! Key-value persistence.
//!
//! Every piece of durable state is a JSON blob stored under a fixed key.
//! [`load`] and [`save`] are the only entry points the stores use; they
//! never fail, so a broken or missing backend degrades to defaults instead
//! of taking the application down.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Key holding the ordered task list.
pub const TASKS_KEY: &str = "nebula-tasks";
/// Key holding the settings record.
pub const SETTINGS_KEY: &str = "nebula-settings";
/// Key holding the cumulative statistics.
pub const STATS_KEY: &str = "nebula-stats";

/// A flat string-to-string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode the blob under `key`, or return `default` when it is
/// absent, unreadable, or does not decode as `T`.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match load_value(store, key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value has unexpected shape, using default");
                default
            }
        },
        None => default,
    }
}

/// Read the blob under `key` as untyped JSON. `None` when absent or malformed.
pub fn load_value(store: &dyn KeyValueStore, key: &str) -> Option<serde_json::Value> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is not valid JSON");
            None
        }
    }
}

/// Serialize `value` and write it under `key`. Failures are logged and dropped.
pub fn save<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to serialize value");
            return;
        }
    };
    if let Err(e) = store.set(key, &json) {
        tracing::warn!(key, error = %e, "failed to persist value");
    }
}

/// Returns `~/.config/nebula[-dev]/` based on NEBULA_ENV.
///
/// Set NEBULA_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NEBULA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("nebula-dev")
    } else {
        base_dir.join("nebula")
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
