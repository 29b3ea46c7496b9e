//! Bedtime prediction.
//!
//! Feeds the three user inputs to a [`Regressor`] and subtracts the predicted
//! sleep from the wake time. The result is a pure function of the input and
//! the model; nothing is cached here.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InferenceError, ValidationError};
use crate::model::{Regressor, SleepFeatures};
use crate::time::TimeOfDay;

pub const MIN_SLEEP_HOURS: f64 = 0.0;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const SLEEP_STEP_HOURS: f64 = 0.5;
pub const MIN_COFFEE_CUPS: u8 = 1;
pub const MAX_COFFEE_CUPS: u8 = 5;

/// Validated user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BedtimeInput {
    wake_time: TimeOfDay,
    sleep_hours: f64,
    coffee_cups: u8,
}

impl BedtimeInput {
    /// Check ranges: sleep in 0..=24 on a half-hour grid, coffee in 1..=5.
    pub fn new(
        wake_time: TimeOfDay,
        sleep_hours: f64,
        coffee_cups: u8,
    ) -> Result<Self, ValidationError> {
        validate_sleep_hours(sleep_hours)?;
        validate_coffee_cups(coffee_cups)?;
        Ok(Self {
            wake_time,
            sleep_hours,
            coffee_cups,
        })
    }

    pub fn wake_time(&self) -> TimeOfDay {
        self.wake_time
    }

    pub fn sleep_hours(&self) -> f64 {
        self.sleep_hours
    }

    pub fn coffee_cups(&self) -> u8 {
        self.coffee_cups
    }

    pub fn features(&self) -> SleepFeatures {
        SleepFeatures {
            wake: f64::from(self.wake_time.seconds_since_midnight()),
            estimated_sleep: self.sleep_hours,
            coffee: f64::from(self.coffee_cups),
        }
    }
}

pub(crate) fn validate_sleep_hours(hours: f64) -> Result<(), ValidationError> {
    if !(MIN_SLEEP_HOURS..=MAX_SLEEP_HOURS).contains(&hours) {
        return Err(ValidationError::OutOfRange {
            field: "sleep_hours",
            value: hours,
            min: MIN_SLEEP_HOURS,
            max: MAX_SLEEP_HOURS,
        });
    }
    if (hours / SLEEP_STEP_HOURS).fract() != 0.0 {
        return Err(ValidationError::InvalidStep {
            field: "sleep_hours",
            value: hours,
            step: SLEEP_STEP_HOURS,
        });
    }
    Ok(())
}

pub(crate) fn validate_coffee_cups(cups: u8) -> Result<(), ValidationError> {
    if !(MIN_COFFEE_CUPS..=MAX_COFFEE_CUPS).contains(&cups) {
        return Err(ValidationError::OutOfRange {
            field: "coffee_cups",
            value: f64::from(cups),
            min: f64::from(MIN_COFFEE_CUPS),
            max: f64::from(MAX_COFFEE_CUPS),
        });
    }
    Ok(())
}

/// Result of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub wake_time: TimeOfDay,
    pub predicted_sleep_seconds: f64,
    pub bedtime: TimeOfDay,
}

/// Raw prediction from scalar inputs.
///
/// `model` is `None` when no coefficients could be loaded, which yields
/// [`InferenceError::Unavailable`].
pub fn predict(
    wake_seconds_since_midnight: f64,
    desired_sleep_hours: f64,
    coffee_count: f64,
    model: Option<&dyn Regressor>,
) -> Result<f64, InferenceError> {
    let model = model.ok_or_else(|| InferenceError::unavailable("no model coefficients loaded"))?;
    model.predict(&SleepFeatures {
        wake: wake_seconds_since_midnight,
        estimated_sleep: desired_sleep_hours,
        coffee: coffee_count,
    })
}

/// Predict the bedtime for validated input.
pub fn predict_bedtime(
    input: &BedtimeInput,
    model: Option<&dyn Regressor>,
) -> Result<Prediction, InferenceError> {
    let features = input.features();
    let predicted_sleep_seconds = predict(
        features.wake,
        features.estimated_sleep,
        features.coffee,
        model,
    )?;
    let bedtime = input.wake_time.wrapping_sub_seconds(predicted_sleep_seconds);

    debug!(
        wake = %input.wake_time,
        sleep_hours = input.sleep_hours,
        coffee_cups = input.coffee_cups,
        predicted_sleep_seconds,
        bedtime = %bedtime,
        "predicted bedtime"
    );

    Ok(Prediction {
        wake_time: input.wake_time,
        predicted_sleep_seconds,
        bedtime,
    })
}
