pub mod completions;
pub mod config;
pub mod notifications;
pub mod run;
pub mod settings;
pub mod stats;

use std::sync::Arc;

use pomocycle_core::{AppConfig, SharedStore, SqliteStore};

/// Open the store in the configured data directory.
pub fn open_store(config: &AppConfig) -> Result<SharedStore, Box<dyn std::error::Error>> {
    let store = SqliteStore::open_in(&config.data_dir()?)?;
    Ok(Arc::new(store))
}
