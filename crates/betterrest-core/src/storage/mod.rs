mod config;

pub use config::{Config, DefaultsConfig, DisplayConfig, ModelConfig};

use std::path::PathBuf;

use crate::error::Result;

pub const MODEL_FILE_NAME: &str = "sleep_calculator.toml";

/// Returns `~/.config/betterrest[-dev]/` based on BETTERREST_ENV.
///
/// Set BETTERREST_ENV=dev to use the development data directory.
/// BETTERREST_HOME, when set, replaces the whole path.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("BETTERREST_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BETTERREST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("betterrest-dev")
            } else {
                base_dir.join("betterrest")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
