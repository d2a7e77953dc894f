use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_of_day::{hh_mm, parse_time_of_day, truncate_to_minute};
use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Lowercase name as stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = BookingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str() == normalized)
            .ok_or_else(|| BookingError::Validation(format!("Invalid day of week: {:?}", value)))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

/// A recurring weekly interval during which a doctor accepts appointments.
///
/// Times carry minute precision; `start_time < end_time` always holds for
/// values built through [`AvailabilityWindow::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AvailabilityWindow {
    pub day_of_week: DayOfWeek,
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(
        day_of_week: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> BookingResult<Self> {
        let start_time = truncate_to_minute(start_time);
        let end_time = truncate_to_minute(end_time);

        if start_time >= end_time {
            return Err(BookingError::Validation(
                "Start time must be before end time".to_string(),
            ));
        }

        Ok(Self {
            day_of_week,
            start_time,
            end_time,
        })
    }

    /// Builds a window from raw form or wire strings.
    pub fn parse(day_of_week: &str, start_time: &str, end_time: &str) -> BookingResult<Self> {
        Self::new(
            day_of_week.parse()?,
            parse_time_of_day(start_time)?,
            parse_time_of_day(end_time)?,
        )
    }
}

fn default_available() -> bool {
    true
}

/// Availability entry exactly as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub id: i64,
    pub doctor_id: Uuid,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

impl AvailabilityRecord {
    /// Validates the record, returning `None` when it is switched off.
    pub fn to_window(&self) -> BookingResult<Option<AvailabilityWindow>> {
        if !self.is_available {
            return Ok(None);
        }

        AvailabilityWindow::parse(&self.day_of_week, &self.start_time, &self.end_time)
            .map(Some)
            .map_err(|err| match err {
                BookingError::Validation(reason) => BookingError::Validation(format!(
                    "Availability {} is malformed: {}",
                    self.id, reason
                )),
                other => other,
            })
    }
}

/// Converts backend records into windows, failing on the first malformed one.
pub fn windows_from_records(records: &[AvailabilityRecord]) -> BookingResult<Vec<AvailabilityWindow>> {
    let mut windows = Vec::with_capacity(records.len());
    for record in records {
        if let Some(window) = record.to_window()? {
            windows.push(window);
        }
    }
    Ok(windows)
}

/// Body of the doctor-side "add availability" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub day_of_week: DayOfWeek,
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
}

impl From<AvailabilityWindow> for CreateAvailabilityRequest {
    fn from(window: AvailabilityWindow) -> Self {
        Self {
            day_of_week: window.day_of_week,
            start_time: window.start_time,
            end_time: window.end_time,
        }
    }
}
