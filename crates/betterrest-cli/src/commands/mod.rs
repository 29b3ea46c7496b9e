pub mod config;
pub mod model;
pub mod predict;

use std::path::PathBuf;

use betterrest_core::Config;

/// Model path from the command line, falling back to the configured one.
pub fn resolve_model_path(
    config: &Config,
    explicit: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(config.model_path()?),
    }
}
