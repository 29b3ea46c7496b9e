//! Regression model for the sleep calculator.
//!
//! The model is trained offline; at runtime it is nothing but four weights
//! read from a TOML model file:
//!
//! ```toml
//! [metadata]
//! name = "SleepCalculator"
//!
//! [coefficients]
//! intercept = 27473.9
//! wake = -0.0001
//! estimated_sleep = 1805.5
//! coffee = 1221.1
//! ```
//!
//! Any problem reading or applying those weights is reported as
//! [`InferenceError::Unavailable`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InferenceError;

/// Feature vector fed to a [`Regressor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepFeatures {
    /// Wake time as seconds since midnight
    pub wake: f64,
    /// Desired amount of sleep in hours
    pub estimated_sleep: f64,
    /// Cups of coffee per day
    pub coffee: f64,
}

/// Something that predicts `actualSleep` (seconds) from [`SleepFeatures`].
pub trait Regressor {
    fn predict(&self, features: &SleepFeatures) -> Result<f64, InferenceError>;
}

/// Linear regression weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub wake: f64,
    pub estimated_sleep: f64,
    pub coffee: f64,
}

impl Coefficients {
    pub fn new(intercept: f64, wake: f64, estimated_sleep: f64, coffee: f64) -> Self {
        Self {
            intercept,
            wake,
            estimated_sleep,
            coffee,
        }
    }

    /// Reject weights that cannot produce a finite prediction.
    pub fn validate(&self) -> Result<(), InferenceError> {
        let named = [
            ("intercept", self.intercept),
            ("wake", self.wake),
            ("estimated_sleep", self.estimated_sleep),
            ("coffee", self.coffee),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(InferenceError::unavailable(format!(
                    "coefficient '{name}' is not finite ({value})"
                )));
            }
        }
        Ok(())
    }

    /// `intercept + wake*w + estimated_sleep*s + coffee*c`, in seconds.
    pub fn predict_sleep_seconds(
        &self,
        wake_seconds: f64,
        desired_sleep_hours: f64,
        coffee_count: f64,
    ) -> Result<f64, InferenceError> {
        self.validate()?;

        let predicted = self.intercept
            + self.wake * wake_seconds
            + self.estimated_sleep * desired_sleep_hours
            + self.coffee * coffee_count;

        if predicted.is_finite() {
            Ok(predicted)
        } else {
            Err(InferenceError::unavailable(
                "prediction overflowed to a non-finite value",
            ))
        }
    }
}

impl Regressor for Coefficients {
    fn predict(&self, features: &SleepFeatures) -> Result<f64, InferenceError> {
        self.predict_sleep_seconds(features.wake, features.estimated_sleep, features.coffee)
    }
}

/// Optional descriptive header of a model file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// On-disk representation of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub metadata: ModelMetadata,
    pub coefficients: Coefficients,
}

impl ModelFile {
    /// Parse and validate a model from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, InferenceError> {
        let model: ModelFile = toml::from_str(content)
            .map_err(|e| InferenceError::unavailable(format!("model file is corrupt: {e}")))?;
        model.coefficients.validate()?;
        Ok(model)
    }

    /// Load a model from disk.
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), "no model file");
            } else {
                warn!(path = %path.display(), error = %e, "could not read model file");
            }
            InferenceError::unavailable(format!(
                "cannot read model file {}: {e}",
                path.display()
            ))
        })?;

        let model = Self::from_toml_str(&content).inspect_err(|e| {
            warn!(path = %path.display(), reason = e.reason(), "rejected model file");
        })?;

        debug!(
            path = %path.display(),
            name = model.metadata.name.as_deref().unwrap_or("<unnamed>"),
            "loaded sleep model"
        );
        Ok(model)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load just the coefficients from a model file.
pub fn load_coefficients(path: &Path) -> Result<Coefficients, InferenceError> {
    ModelFile::load(path).map(|m| m.coefficients)
}
