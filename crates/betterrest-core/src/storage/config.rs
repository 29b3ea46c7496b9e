//! TOML-based application configuration.
//!
//! Stores:
//! - Where the trained model file lives
//! - Default form inputs (wake time, sleep, coffee)
//! - Display preferences
//!
//! Configuration is stored at `~/.config/betterrest/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{data_dir, MODEL_FILE_NAME};
use crate::error::{ConfigError, Result, ValidationError};
use crate::predictor::{validate_coffee_cups, validate_sleep_hours, BedtimeInput};
use crate::time::{ClockFormat, TimeOfDay};

/// Model file location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the coefficients file. Empty means `<data_dir>/sleep_calculator.toml`.
    #[serde(default)]
    pub path: String,
}

/// Inputs used when the caller does not supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_wake_time")]
    pub wake_time: String,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default = "default_coffee_cups")]
    pub coffee_cups: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub clock: ClockFormat,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/betterrest/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_wake_time() -> String {
    "07:00".into()
}
fn default_sleep_hours() -> f64 {
    8.0
}
fn default_coffee_cups() -> u8 {
    1
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            wake_time: default_wake_time(),
            sleep_hours: default_sleep_hours(),
            coffee_cups: default_coffee_cups(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => {
                    return Err(invalid("cannot replace a whole section".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the file with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                if let Err(e) = cfg.validate() {
                    warn!(path = %path.display(), error = %e, "config holds an invalid default");
                }
                debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                debug!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory. The config is left untouched on error.
    ///
    /// Only the updated key is validated, so a bad stored default can be
    /// repaired without touching the others first.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate_key(key)?;
        *self = updated;
        Ok(())
    }

    /// Update a value and persist the result.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check that the stored defaults form a valid input.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.default_input().map(|_| ())
    }

    fn validate_key(&self, key: &str) -> std::result::Result<(), ValidationError> {
        match key {
            "defaults.wake_time" => self.default_wake().map(|_| ()),
            "defaults.sleep_hours" => self.default_sleep().map(|_| ()),
            "defaults.coffee_cups" => self.default_coffee().map(|_| ()),
            _ => Ok(()),
        }
    }

    pub fn default_wake(&self) -> std::result::Result<TimeOfDay, ValidationError> {
        TimeOfDay::parse(&self.defaults.wake_time)
    }

    pub fn default_sleep(&self) -> std::result::Result<f64, ValidationError> {
        validate_sleep_hours(self.defaults.sleep_hours).map(|_| self.defaults.sleep_hours)
    }

    pub fn default_coffee(&self) -> std::result::Result<u8, ValidationError> {
        validate_coffee_cups(self.defaults.coffee_cups).map(|_| self.defaults.coffee_cups)
    }

    /// Default inputs as a validated [`BedtimeInput`].
    pub fn default_input(&self) -> std::result::Result<BedtimeInput, ValidationError> {
        BedtimeInput::new(self.default_wake()?, self.default_sleep()?, self.default_coffee()?)
    }

    /// Resolved model file path.
    pub fn model_path(&self) -> Result<PathBuf> {
        if self.model.path.trim().is_empty() {
            Ok(data_dir()?.join(MODEL_FILE_NAME))
        } else {
            Ok(PathBuf::from(self.model.path.trim()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.defaults.wake_time, "07:00");
        assert_eq!(parsed.display.clock, ClockFormat::Twelve);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.coffee_cups").as_deref(), Some("1"));
        assert_eq!(cfg.get("defaults.sleep_hours").as_deref(), Some("8.0"));
        assert_eq!(cfg.get("display.clock").as_deref(), Some("12h"));
        assert_eq!(cfg.get("model.path").as_deref(), Some(""));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("defaults.coffee_cups", "3").unwrap();
        cfg.apply("defaults.sleep_hours", "7.5").unwrap();
        cfg.apply("defaults.wake_time", "6:30 AM").unwrap();
        cfg.apply("display.clock", "24h").unwrap();
        cfg.apply("model.path", "/tmp/model.toml").unwrap();

        assert_eq!(cfg.defaults.coffee_cups, 3);
        assert_eq!(cfg.defaults.sleep_hours, 7.5);
        assert_eq!(cfg.defaults.wake_time, "6:30 AM");
        assert_eq!(cfg.display.clock, ClockFormat::TwentyFour);
        assert_eq!(cfg.model_path().unwrap(), PathBuf::from("/tmp/model.toml"));
    }

    #[test]
    fn sleep_hours_accepts_integer_text() {
        let mut cfg = Config::default();
        cfg.apply("defaults.sleep_hours", "9").unwrap();
        assert_eq!(cfg.defaults.sleep_hours, 9.0);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("defaults.tea_cups", "2").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert!(cfg.apply("nope.at.all", "2").is_err());
        assert!(cfg.apply("defaults", "2").is_err());
    }

    #[test]
    fn apply_rejects_invalid_values_and_keeps_state() {
        let mut cfg = Config::default();
        assert!(cfg.apply("defaults.coffee_cups", "9").is_err());
        assert!(cfg.apply("defaults.coffee_cups", "two").is_err());
        assert!(cfg.apply("defaults.sleep_hours", "8.1").is_err());
        assert!(cfg.apply("defaults.wake_time", "25:00").is_err());
        assert!(cfg.apply("display.clock", "36h").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "defaults.coffee_cups", "4").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "defaults.coffee_cups").unwrap(),
            &serde_json::json!(4)
        );
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "defaults = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("defaults.coffee_cups", "5").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().defaults.coffee_cups, 5);
    }

    #[test]
    fn load_from_keeps_out_of_range_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ncoffee_cups = 0\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.defaults.coffee_cups, 0);
        assert!(cfg.default_coffee().is_err());
        assert_eq!(cfg.default_sleep().unwrap(), 8.0);
        assert_eq!(cfg.default_wake().unwrap(), TimeOfDay::from_hm(7, 0).unwrap());
    }

    #[test]
    fn apply_repairs_bad_default_and_ignores_other_bad_keys() {
        let mut cfg = Config::default();
        cfg.defaults.coffee_cups = 0;

        cfg.apply("defaults.wake_time", "06:00").unwrap();
        assert_eq!(cfg.defaults.wake_time, "06:00");

        cfg.apply("defaults.coffee_cups", "2").unwrap();
        assert_eq!(cfg.defaults.coffee_cups, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn apply_accepts_bare_clock_hours() {
        let mut cfg = Config::default();
        cfg.apply("display.clock", "24").unwrap();
        assert_eq!(cfg.display.clock, ClockFormat::TwentyFour);
        cfg.apply("display.clock", "12").unwrap();
        assert_eq!(cfg.display.clock, ClockFormat::Twelve);
    }

    #[test]
    fn default_input_is_valid() {
        let input = Config::default().default_input().unwrap();
        assert_eq!(input.wake_time(), TimeOfDay::from_hm(7, 0).unwrap());
        assert_eq!(input.sleep_hours(), 8.0);
        assert_eq!(input.coffee_cups(), 1);
    }
}
