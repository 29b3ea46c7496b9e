//! Headless state of the bedtime form.
//!
//! Holds the three inputs and the last calculated [`Outcome`]. Changing any
//! input clears the outcome, so a stale bedtime is never shown next to new
//! inputs.

use serde::Serialize;
use tracing::debug;

use crate::error::{InferenceError, ValidationError};
use crate::model::Regressor;
use crate::predictor::{
    predict_bedtime, validate_coffee_cups, validate_sleep_hours, BedtimeInput, Prediction,
    MAX_SLEEP_HOURS, MIN_SLEEP_HOURS, SLEEP_STEP_HOURS,
};
use crate::time::{ClockFormat, TimeOfDay};

pub const SUCCESS_TITLE: &str = "Your ideal bedtime is..";
pub const ERROR_TITLE: &str = "Error";

/// Alert-style result of pressing Calculate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub title: String,
    pub message: String,
    /// `None` when inference was unavailable
    pub prediction: Option<Prediction>,
}

impl Outcome {
    fn success(prediction: Prediction, clock: ClockFormat) -> Self {
        Self {
            title: SUCCESS_TITLE.to_string(),
            message: prediction.bedtime.format(clock),
            prediction: Some(prediction),
        }
    }

    fn failure() -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            message: InferenceError::USER_MESSAGE.to_string(),
            prediction: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.prediction.is_none()
    }
}

/// The form: wake time, desired sleep, coffee intake.
#[derive(Debug, Clone)]
pub struct SleepForm {
    wake_time: TimeOfDay,
    sleep_hours: f64,
    coffee_cups: u8,
    clock: ClockFormat,
    outcome: Option<Outcome>,
}

impl Default for SleepForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepForm {
    /// 07:00 wake, 8 hours of sleep, one cup of coffee.
    pub fn new() -> Self {
        Self {
            wake_time: default_wake_time(),
            sleep_hours: 8.0,
            coffee_cups: 1,
            clock: ClockFormat::default(),
            outcome: None,
        }
    }

    pub fn with_clock(mut self, clock: ClockFormat) -> Self {
        self.clock = clock;
        self
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

    pub fn set_wake_time(&mut self, wake_time: TimeOfDay) {
        if wake_time != self.wake_time {
            self.wake_time = wake_time;
            self.invalidate();
        }
    }

    pub fn set_sleep_hours(&mut self, hours: f64) -> Result<(), ValidationError> {
        validate_sleep_hours(hours)?;
        if hours != self.sleep_hours {
            self.sleep_hours = hours;
            self.invalidate();
        }
        Ok(())
    }

    pub fn set_coffee_cups(&mut self, cups: u8) -> Result<(), ValidationError> {
        validate_coffee_cups(cups)?;
        if cups != self.coffee_cups {
            self.coffee_cups = cups;
            self.invalidate();
        }
        Ok(())
    }

    /// Stepper `+`: half an hour more, capped at 24.
    pub fn increment_sleep(&mut self) {
        let next = (self.sleep_hours + SLEEP_STEP_HOURS).min(MAX_SLEEP_HOURS);
        if next != self.sleep_hours {
            self.sleep_hours = next;
            self.invalidate();
        }
    }

    /// Stepper `-`: half an hour less, floored at 0.
    pub fn decrement_sleep(&mut self) {
        let next = (self.sleep_hours - SLEEP_STEP_HOURS).max(MIN_SLEEP_HOURS);
        if next != self.sleep_hours {
            self.sleep_hours = next;
            self.invalidate();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Run the prediction and cache the outcome until the next input change.
    pub fn calculate(&mut self, model: Option<&dyn Regressor>) -> &Outcome {
        let outcome = match BedtimeInput::new(self.wake_time, self.sleep_hours, self.coffee_cups) {
            Ok(input) => match predict_bedtime(&input, model) {
                Ok(prediction) => Outcome::success(prediction, self.clock),
                Err(e) => {
                    debug!(reason = e.reason(), "bedtime calculation failed");
                    Outcome::failure()
                }
            },
            Err(e) => {
                debug!(error = %e, "form input rejected");
                Outcome::failure()
            }
        };
        self.outcome.insert(outcome)
    }

    /// `1 cup`, `3 cups`.
    pub fn coffee_label(&self) -> String {
        if self.coffee_cups == 1 {
            "1 cup".to_string()
        } else {
            format!("{} cups", self.coffee_cups)
        }
    }

    /// `8 hours`, `7.5 hours`.
    pub fn sleep_label(&self) -> String {
        format!("{} hours", self.sleep_hours)
    }

    fn invalidate(&mut self) {
        self.outcome = None;
    }
}

fn default_wake_time() -> TimeOfDay {
    TimeOfDay::from_hm(7, 0).unwrap_or(TimeOfDay::MIDNIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coefficients;

    fn eight_hours() -> Coefficients {
        Coefficients::new(0.0, 0.0, 3600.0, 0.0)
    }

    #[test]
    fn test_defaults() {
        let form = SleepForm::new();
        assert_eq!(form.wake_time(), TimeOfDay::from_hm(7, 0).unwrap());
        assert_eq!(form.sleep_hours(), 8.0);
        assert_eq!(form.coffee_cups(), 1);
        assert!(form.is_dirty());
        assert!(form.outcome().is_none());
    }

    #[test]
    fn test_calculate_success() {
        let mut form = SleepForm::new();
        let model = eight_hours();
        let outcome = form.calculate(Some(&model)).clone();
        assert_eq!(outcome.title, SUCCESS_TITLE);
        assert_eq!(outcome.message, "11:00 PM");
        assert!(!outcome.is_error());
        assert_eq!(outcome.prediction.unwrap().predicted_sleep_seconds, 28_800.0);
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_calculate_without_model_shows_fallback() {
        let mut form = SleepForm::new();
        let outcome = form.calculate(None);
        assert_eq!(outcome.title, ERROR_TITLE);
        assert_eq!(
            outcome.message,
            "Sorry, there was an error calculating your bedtime."
        );
        assert!(outcome.is_error());
    }

    #[test]
    fn test_every_setter_invalidates() {
        let model = eight_hours();
        let mut form = SleepForm::new();

        form.calculate(Some(&model));
        form.set_wake_time(TimeOfDay::from_hm(6, 30).unwrap());
        assert!(form.is_dirty());

        form.calculate(Some(&model));
        form.set_sleep_hours(7.5).unwrap();
        assert!(form.is_dirty());

        form.calculate(Some(&model));
        form.set_coffee_cups(3).unwrap();
        assert!(form.is_dirty());

        form.calculate(Some(&model));
        form.increment_sleep();
        assert!(form.is_dirty());

        form.calculate(Some(&model));
        form.decrement_sleep();
        assert!(form.is_dirty());
    }

    #[test]
    fn test_same_value_keeps_outcome() {
        let model = eight_hours();
        let mut form = SleepForm::new();
        form.calculate(Some(&model));
        form.set_coffee_cups(1).unwrap();
        form.set_wake_time(TimeOfDay::from_hm(7, 0).unwrap());
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_rejected_input_keeps_previous_value() {
        let mut form = SleepForm::new();
        assert!(form.set_coffee_cups(6).is_err());
        assert!(form.set_sleep_hours(8.2).is_err());
        assert_eq!(form.coffee_cups(), 1);
        assert_eq!(form.sleep_hours(), 8.0);
    }

    #[test]
    fn test_stepper_clamps() {
        let mut form = SleepForm::new();
        form.set_sleep_hours(24.0).unwrap();
        form.increment_sleep();
        assert_eq!(form.sleep_hours(), 24.0);

        form.set_sleep_hours(0.0).unwrap();
        form.decrement_sleep();
        assert_eq!(form.sleep_hours(), 0.0);
        form.increment_sleep();
        assert_eq!(form.sleep_hours(), 0.5);
    }

    #[test]
    fn test_labels() {
        let mut form = SleepForm::new();
        assert_eq!(form.coffee_label(), "1 cup");
        assert_eq!(form.sleep_label(), "8 hours");
        form.set_coffee_cups(4).unwrap();
        form.increment_sleep();
        assert_eq!(form.coffee_label(), "4 cups");
        assert_eq!(form.sleep_label(), "8.5 hours");
    }

    #[test]
    fn test_clock_format_applies_to_message() {
        let model = eight_hours();
        let mut form = SleepForm::new().with_clock(ClockFormat::TwentyFour);
        assert_eq!(form.calculate(Some(&model)).message, "23:00");
    }
}
