//! # Slot Derivation
//!
//! Turns a doctor's recurring weekly availability into the concrete
//! (date, time) slots a patient can book over a fixed horizon.
//!
//! ## Algorithm
//!
//! 1. Walk the half-open date range `[today, today + horizon_days)`
//! 2. For each date, pick the windows whose weekday matches
//! 3. Step from each window's start in `slot_interval_minutes` increments while
//!    the step is strictly before the window's end
//! 4. Drop any (date, time) held by a pending or confirmed appointment of the
//!    same doctor, compared at minute precision
//! 5. Collect into an ordered set, which removes duplicates from overlapping
//!    windows and sorts by (date, time)
//!
//! Only the start of a slot is checked against the window end, so with a
//! 30 minute interval a 09:00-09:50 window yields 09:00 and 09:30.
//!
//! The derivation is pure: `today` is passed in and nothing is cached, so
//! callers re-derive from fresh appointments after every booking attempt.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::Appointment,
        availability::{AvailabilityWindow, DayOfWeek},
        slot::Slot,
        time_of_day::{from_minutes, minutes_since_midnight},
    },
};

pub const DEFAULT_HORIZON_DAYS: u32 = 14;
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDeriver {
    horizon_days: u32,
    slot_interval_minutes: u32,
}

impl Default for SlotDeriver {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }
}

impl SlotDeriver {
    /// Creates a deriver, rejecting a zero horizon or a zero interval.
    pub fn new(horizon_days: u32, slot_interval_minutes: u32) -> BookingResult<Self> {
        if horizon_days == 0 {
            return Err(BookingError::Validation(
                "Horizon must cover at least one day".to_string(),
            ));
        }
        if slot_interval_minutes == 0 {
            return Err(BookingError::Validation(
                "Slot interval must be greater than zero minutes".to_string(),
            ));
        }

        Ok(Self {
            horizon_days,
            slot_interval_minutes,
        })
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn slot_interval_minutes(&self) -> u32 {
        self.slot_interval_minutes
    }

    /// Start times generated for a single window, in ascending order.
    pub fn slot_starts(&self, window: &AvailabilityWindow) -> Vec<NaiveTime> {
        let end = minutes_since_midnight(window.end_time);
        let mut minute = minutes_since_midnight(window.start_time);
        let mut starts = Vec::new();

        while minute < end {
            match from_minutes(minute) {
                Some(time) => starts.push(time),
                None => break,
            }
            minute = minute.saturating_add(self.slot_interval_minutes);
        }

        starts
    }

    /// Bookable slots for `doctor_id`, sorted by (date, time) with no duplicates.
    ///
    /// Appointments belonging to other doctors are ignored, as are cancelled
    /// and completed ones.
    pub fn derive(
        &self,
        doctor_id: Uuid,
        windows: &[AvailabilityWindow],
        existing: &[Appointment],
        today: NaiveDate,
    ) -> Vec<Slot> {
        if windows.is_empty() {
            return Vec::new();
        }

        let taken: HashSet<(NaiveDate, NaiveTime)> = existing
            .iter()
            .filter_map(|appointment| appointment.held_slot(doctor_id))
            .collect();

        let mut slots = BTreeSet::new();
        for offset in 0..self.horizon_days {
            let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            let weekday = DayOfWeek::from(date.weekday());

            for window in windows.iter().filter(|window| window.day_of_week == weekday) {
                for time in self.slot_starts(window) {
                    if !taken.contains(&(date, time)) {
                        slots.insert(Slot::new(date, time));
                    }
                }
            }
        }

        slots.into_iter().collect()
    }

    /// Like [`SlotDeriver::derive`], but tells apart the two empty cases.
    pub fn assess(
        &self,
        doctor_id: Uuid,
        windows: &[AvailabilityWindow],
        existing: &[Appointment],
        today: NaiveDate,
    ) -> SlotOutcome {
        if windows.is_empty() {
            return SlotOutcome::NoAvailability;
        }

        let slots = self.derive(doctor_id, windows, existing, today);
        if slots.is_empty() {
            SlotOutcome::FullyBooked {
                horizon_days: self.horizon_days,
            }
        } else {
            SlotOutcome::Open(slots)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The doctor has not configured any availability.
    NoAvailability,
    /// Availability exists but every slot in the horizon is held.
    FullyBooked { horizon_days: u32 },
    Open(Vec<Slot>),
}

impl SlotOutcome {
    pub fn slots(&self) -> &[Slot] {
        match self {
            SlotOutcome::Open(slots) => slots.as_slice(),
            _ => &[],
        }
    }

    /// The derived slot at exactly `(date, time)`, if there is one.
    pub fn find(&self, date: NaiveDate, time: NaiveTime) -> Option<Slot> {
        self.slots()
            .iter()
            .find(|slot| slot.date == date && slot.time == time)
            .copied()
    }

    /// User-facing text for the empty outcomes.
    pub fn empty_message(&self) -> Option<String> {
        match self {
            SlotOutcome::NoAvailability => Some(
                "This doctor has not set any availability yet. Please try another doctor."
                    .to_string(),
            ),
            SlotOutcome::FullyBooked { horizon_days } => Some(format!(
                "All appointment slots for the next {} days are taken. Please check back later.",
                horizon_days
            )),
            SlotOutcome::Open(_) => None,
        }
    }
}
