//! # MediBook Core
//!
//! Domain types for the appointment-booking client and the slot derivation
//! that turns a doctor's weekly availability into concrete bookable slots.
//!
//! Nothing in this crate performs I/O. Values arrive already deserialized
//! from the booking backend, are validated at the boundary (see
//! [`models::availability::AvailabilityRecord::to_window`]), and are then
//! handed to [`slots::SlotDeriver`].

/// Error type shared by the core and the client
pub mod errors;
/// Availability, appointment, doctor, slot, medical record and profile models
pub mod models;
/// Bookable slot derivation
pub mod slots;
