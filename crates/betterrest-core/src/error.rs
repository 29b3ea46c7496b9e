//! Core error types for betterrest-core.
//!
//! The predictor itself only ever fails one way ([`InferenceError`]); the
//! remaining types cover configuration, input validation and file access.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for betterrest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Model inference could not be performed
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to load or apply the regression coefficients.
///
/// Never fatal: callers surface [`InferenceError::USER_MESSAGE`] and carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("InferenceUnavailable: {reason}")]
    Unavailable { reason: String },
}

impl InferenceError {
    /// Message shown to the user in place of a bedtime.
    pub const USER_MESSAGE: &'static str = "Sorry, there was an error calculating your bedtime.";

    pub fn unavailable(reason: impl Into<String>) -> Self {
        InferenceError::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            InferenceError::Unavailable { reason } => reason,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user-supplied inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its permitted range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value not on the permitted grid
    #[error("{field} must be a multiple of {step}, got {value}")]
    InvalidStep {
        field: &'static str,
        value: f64,
        step: f64,
    },

    /// Unparseable or impossible time of day
    #[error("Invalid time of day: '{0}' (expected HH:MM or h:MM AM/PM)")]
    InvalidTime(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_error_names_the_kind() {
        let err = InferenceError::unavailable("model file not found");
        assert_eq!(
            err.to_string(),
            "InferenceUnavailable: model file not found"
        );
        assert_eq!(err.reason(), "model file not found");
    }

    #[test]
    fn core_error_is_transparent_for_inference() {
        let err: CoreError = InferenceError::unavailable("x").into();
        assert_eq!(err.to_string(), "InferenceUnavailable: x");
    }

    #[test]
    fn out_of_range_message() {
        let err = ValidationError::OutOfRange {
            field: "coffee_cups",
            value: 7.0,
            min: 1.0,
            max: 5.0,
        };
        assert_eq!(err.to_string(), "coffee_cups must be between 1 and 5, got 7");
    }
}
