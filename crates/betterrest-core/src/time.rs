//! Wall-clock time of day without a date.
//!
//! Wake times and bedtimes are both [`TimeOfDay`] values, so subtracting a
//! predicted sleep duration always lands somewhere in `00:00..24:00`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Time of day backed by [`chrono::NaiveTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(NaiveTime);

/// How a [`TimeOfDay`] is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockFormat {
    /// `10:45 PM`
    #[default]
    #[serde(rename = "12h", alias = "12")]
    Twelve,
    /// `22:45`
    #[serde(rename = "24h", alias = "24")]
    TwentyFour,
}

impl TimeOfDay {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    /// Build from hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(|| ValidationError::InvalidTime(format!("{hour:02}:{minute:02}")))
    }

    /// Parse `HH:MM` (24-hour) or `h:MM AM`/`h:MM PM`.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let normalized = text.trim().to_ascii_uppercase();
        let meridiem = normalized
            .strip_suffix("AM")
            .or_else(|| normalized.strip_suffix("PM"));
        let normalized = match meridiem {
            Some(head) => format!("{} {}", head.trim_end(), &normalized[normalized.len() - 2..]),
            None => normalized.clone(),
        };

        NaiveTime::parse_from_str(&normalized, "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(&normalized, "%H:%M"))
            .map(TimeOfDay)
            .map_err(|_| ValidationError::InvalidTime(text.to_string()))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Whole seconds elapsed since midnight.
    pub fn seconds_since_midnight(&self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    /// Seconds since midnight including the sub-second part.
    pub fn seconds_f64(&self) -> f64 {
        f64::from(self.0.num_seconds_from_midnight()) + f64::from(self.0.nanosecond()) / 1e9
    }

    /// Subtract `seconds` modulo one day. Negative values move forward.
    pub fn wrapping_sub_seconds(&self, seconds: f64) -> TimeOfDay {
        let day = f64::from(SECONDS_PER_DAY);
        let total = (self.seconds_f64() - seconds).rem_euclid(day);

        let mut whole = total.floor();
        let mut nanos = ((total - whole) * 1e9).round();
        if nanos >= 1e9 {
            whole += 1.0;
            nanos = 0.0;
        }
        let whole = (whole as u32) % SECONDS_PER_DAY;

        NaiveTime::from_num_seconds_from_midnight_opt(whole, nanos as u32)
            .map(TimeOfDay)
            .unwrap_or(Self::MIDNIGHT)
    }

    /// Render for display; seconds are truncated.
    pub fn format(&self, clock: ClockFormat) -> String {
        match clock {
            ClockFormat::Twelve => self.0.format("%-I:%M %p").to_string(),
            ClockFormat::TwentyFour => self.0.format("%H:%M").to_string(),
        }
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay(time)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(ClockFormat::TwentyFour))
    }
}

impl FromStr for ClockFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12h" | "12" => Ok(ClockFormat::Twelve),
            "24h" | "24" => Ok(ClockFormat::TwentyFour),
            other => Err(format!("unknown clock format '{other}' (use 12h or 24h)")),
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockFormat::Twelve => f.write_str("12h"),
            ClockFormat::TwentyFour => f.write_str("24h"),
        }
    }
}
