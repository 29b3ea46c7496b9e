//! # BetterRest Core Library
//!
//! Recommends a bedtime from three inputs: when you want to wake up, how much
//! sleep you want, and how much coffee you drink. A linear regression model
//! trained offline predicts how long you will actually need to sleep; the
//! bedtime is the wake time minus that prediction, wrapped around midnight.
//!
//! ## Key Components
//!
//! - [`TimeOfDay`]: wall-clock value without a date
//! - [`Coefficients`] / [`ModelFile`]: the trained weights and their TOML file
//! - [`predict_bedtime`]: the prediction itself
//! - [`SleepForm`]: headless form state that drops stale results on input change
//! - [`Config`]: application configuration management

pub mod error;
pub mod form;
pub mod model;
pub mod predictor;
pub mod storage;
pub mod time;

pub use error::{ConfigError, CoreError, InferenceError, ValidationError};
pub use form::{Outcome, SleepForm};
pub use model::{
    load_coefficients, Coefficients, ModelFile, ModelMetadata, Regressor, SleepFeatures,
};
pub use predictor::{predict, predict_bedtime, BedtimeInput, Prediction};
pub use storage::Config;
pub use time::{ClockFormat, TimeOfDay};
