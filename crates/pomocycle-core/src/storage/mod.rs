mod config;
pub mod database;
mod memory;

pub use config::{AppConfig, LoggingConfig, NotificationsConfig, SoundBackend, SoundConfig, StorageConfig, TimerConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, StorageError};
use crate::settings::Settings;
use crate::stats::Stats;

/// Key of the persisted settings record.
pub const SETTINGS_KEY: &str = "settings";
/// Key of the persisted stats record.
pub const STATS_KEY: &str = "stats";

/// Returns `~/.config/pomocycle[-dev]/` based on POMOCYCLE_ENV.
///
/// Set POMOCYCLE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOCYCLE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomocycle-dev")
    } else {
        base_dir.join("pomocycle")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Key-value persistence port for the two JSON records.
///
/// Implementors only provide raw string access; the typed record helpers
/// merge stored JSON with defaults and fall back to defaults on any read
/// failure.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn load_settings(&self) -> Settings {
        load_record(self, SETTINGS_KEY)
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        save_record(self, SETTINGS_KEY, settings)
    }

    fn load_stats(&self) -> Stats {
        load_record(self, STATS_KEY)
    }

    fn save_stats(&self, stats: &Stats) -> Result<()> {
        save_record(self, STATS_KEY, stats)
    }
}

/// Store shared between the session runtime and the surrounding shell.
pub type SharedStore = Arc<dyn Store>;

fn load_record<S, T>(store: &S, key: &str) -> T
where
    S: Store + ?Sized,
    T: serde::de::DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read record, using defaults");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt record, using defaults");
            T::default()
        }
    }
}

fn save_record<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: Store + ?Sized,
    T: serde::Serialize,
{
    let json = serde_json::to_string(value).map_err(|e| StorageError::EncodeFailed {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &json)?;
    Ok(())
}
