mod config;
pub mod database;
pub mod migrations;
mod traits;

pub use config::{ClockConfig, Config, StorageConfig};
pub use database::{Database, NewEmotionRecord, DATABASE_FILE};
pub use traits::EmotionStore;

use std::path::PathBuf;

/// Returns `~/.config/emobattery[-dev]/` based on EMOBATTERY_ENV.
///
/// Set EMOBATTERY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> crate::error::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EMOBATTERY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("emobattery-dev")
    } else {
        base_dir.join("emobattery")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
