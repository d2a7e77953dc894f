//! Wall-clock time-of-day helpers.
//!
//! The booking backend sends times as `HH:MM:SS`, sometimes with fractional
//! seconds, while form input is usually `HH:MM`; all of these are accepted and
//! truncated to the minute. Slot arithmetic works in whole minutes since
//! midnight so a step can never wrap past midnight.

use chrono::{NaiveTime, Timelike};

use crate::errors::{BookingError, BookingResult};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses `HH:MM`, `HH:MM:SS` or `HH:MM:SS.ffffff` into a minute-precision
/// [`NaiveTime`].
pub fn parse_time_of_day(value: &str) -> BookingResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map(truncate_to_minute)
        .map_err(|_| BookingError::Validation(format!("Invalid time of day: {:?}", value)))
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minutes_since_midnight`]; `None` once the value reaches 24:00.
pub fn from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    from_minutes(minutes_since_midnight(time)).unwrap_or(time)
}

/// Serde adapter writing `HH:MM` and reading anything [`parse_time_of_day`]
/// accepts.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(D::Error::custom)
    }
}
