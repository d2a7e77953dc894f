//! # Booking Flow
//!
//! Glue between the booking backend and [`SlotDeriver`]. Each call fetches
//! fresh availability and appointments and derives slots from scratch; no
//! slot list is ever kept between calls, so what is shown always reflects
//! the latest server state.
//!
//! When a booking is rejected because someone else took the slot first, the
//! flow re-derives and hands back the refreshed outcome instead of retrying.

use chrono::{NaiveDate, NaiveTime};
use medibook_core::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{
            validate_reason, Appointment, AppointmentStatus, BookingRequest, UpdateStatusRequest,
        },
        availability::windows_from_records,
        slot::Slot,
    },
    slots::{SlotDeriver, SlotOutcome},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{AppointmentScope, BookingApi};

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Appointment),
    /// The slot was taken between derivation and submission.
    SlotTaken { slot: Slot, refreshed: SlotOutcome },
}

pub struct BookingFlow<A> {
    api: A,
    deriver: SlotDeriver,
}

impl<A: BookingApi> BookingFlow<A> {
    pub fn new(api: A, deriver: SlotDeriver) -> Self {
        Self { api, deriver }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn deriver(&self) -> &SlotDeriver {
        &self.deriver
    }

    /// Fetches availability and appointments, then derives bookable slots.
    pub async fn load_slots(
        &self,
        doctor_id: Uuid,
        scope: AppointmentScope,
        today: NaiveDate,
    ) -> BookingResult<SlotOutcome> {
        let records = self.api.doctor_availability(doctor_id).await?;
        let windows = windows_from_records(&records)?;
        if windows.len() < records.len() {
            debug!(
                "Ignoring {} disabled availability entries for doctor {}",
                records.len() - windows.len(),
                doctor_id
            );
        }
        if windows.is_empty() {
            debug!("Doctor {} has no availability configured", doctor_id);
            return Ok(SlotOutcome::NoAvailability);
        }

        let existing = self.api.appointments(scope).await?;
        let outcome = self.deriver.assess(doctor_id, &windows, &existing, today);

        debug!(
            "Derived {} slots for doctor {} from {} windows and {} appointments",
            outcome.slots().len(),
            doctor_id,
            windows.len(),
            existing.len()
        );
        Ok(outcome)
    }

    /// Submits a booking for a slot taken from a previous derivation.
    pub async fn book(
        &self,
        doctor_id: Uuid,
        slot: &Slot,
        reason: &str,
        scope: AppointmentScope,
        today: NaiveDate,
    ) -> BookingResult<BookingOutcome> {
        let request = BookingRequest::for_slot(doctor_id, slot, reason)?;

        match self.api.book(&request).await {
            Ok(appointment) => {
                info!(
                    "Booked appointment {} with doctor {} on {} at {}",
                    appointment.id,
                    doctor_id,
                    slot.date,
                    slot.time.format("%H:%M")
                );
                Ok(BookingOutcome::Booked(appointment))
            }
            Err(err) if err.is_recoverable() => {
                warn!(
                    "Slot {} {} with doctor {} was taken: {}",
                    slot.date,
                    slot.time.format("%H:%M"),
                    doctor_id,
                    err
                );
                let refreshed = self.load_slots(doctor_id, scope, today).await?;
                Ok(BookingOutcome::SlotTaken {
                    slot: *slot,
                    refreshed,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Books `(date, time)` only if it is among the currently derived slots.
    pub async fn book_at(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        reason: &str,
        scope: AppointmentScope,
        today: NaiveDate,
    ) -> BookingResult<BookingOutcome> {
        validate_reason(reason)?;

        let outcome = self.load_slots(doctor_id, scope, today).await?;
        let slot = match outcome.find(date, time) {
            Some(slot) => slot,
            None => {
                let message = outcome.empty_message().unwrap_or_else(|| {
                    format!(
                        "{} at {} is not an open slot for this doctor",
                        date,
                        time.format("%H:%M")
                    )
                });
                return Err(BookingError::Validation(message));
            }
        };

        self.book(doctor_id, &slot, reason, scope, today).await
    }

    pub async fn cancel(&self, appointment_id: i64) -> BookingResult<Appointment> {
        self.update_status(appointment_id, AppointmentStatus::Cancelled, None)
            .await
    }

    /// Moves an appointment to `status`, optionally recording visit notes.
    pub async fn update_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
        notes: Option<&str>,
    ) -> BookingResult<Appointment> {
        let update = UpdateStatusRequest::to_status(status).with_notes(notes);
        let appointment = self.api.update_status(appointment_id, &update).await?;
        info!("Appointment {} is now {}", appointment_id, appointment.status);
        Ok(appointment)
    }
}
