use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    slot::Slot,
    time_of_day::{hh_mm, truncate_to_minute},
};
use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Pending and confirmed appointments keep their (date, time) reserved.
    pub fn holds_slot(self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            _ => Err(BookingError::Validation(format!(
                "Invalid appointment status: {:?}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub doctor_name: String,
    pub created_at: NaiveDateTime,
}

impl Appointment {
    /// The (date, minute) this appointment keeps `doctor_id` busy at, if any.
    pub fn held_slot(&self, doctor_id: Uuid) -> Option<(NaiveDate, NaiveTime)> {
        if self.doctor_id != doctor_id || !self.status.holds_slot() {
            return None;
        }
        Some((self.date, truncate_to_minute(self.time)))
    }
}

/// Trims the free-text reason and rejects it when nothing is left.
pub fn validate_reason(reason: &str) -> BookingResult<&str> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(BookingError::Validation(
            "A reason for the visit is required".to_string(),
        ));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    pub reason: String,
}

impl BookingRequest {
    /// Builds the request for a slot previously produced by the deriver.
    pub fn for_slot(doctor_id: Uuid, slot: &Slot, reason: &str) -> BookingResult<Self> {
        let reason = validate_reason(reason)?;
        Ok(Self {
            doctor_id,
            date: slot.date,
            time: slot.time,
            reason: reason.to_string(),
        })
    }
}

/// Body of `PATCH /appointments/{id}/status`; absent fields are left as is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateStatusRequest {
    pub fn to_status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            notes: None,
        }
    }

    /// Attaches visit notes; blank notes are dropped.
    pub fn with_notes(mut self, notes: Option<&str>) -> Self {
        self.notes = notes
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);
        self
    }
}
