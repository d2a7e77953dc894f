use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{availability::DayOfWeek, time_of_day::hh_mm};

/// A concrete bookable (date, time), derived on every load and never stored.
///
/// Ordering is by date, then time; `day_of_week` always follows from `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    pub day_of_week: DayOfWeek,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time,
            day_of_week: date.weekday().into(),
        }
    }
}
