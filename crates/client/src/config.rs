//! # Client Configuration
//!
//! Configuration for the MediBook client, read from environment variables
//! (a `.env` file is loaded by the binary before this runs).
//!
//! ## Environment Variables
//!
//! - `MEDIBOOK_API_URL`: Base URL of the booking backend, e.g. `http://localhost:8000/api/v1` (required)
//! - `MEDIBOOK_API_TOKEN`: Bearer token issued by the session service
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `MEDIBOOK_HORIZON_DAYS`: Days of slots to offer (default: 14)
//! - `MEDIBOOK_SLOT_INTERVAL_MINUTES`: Minutes between slot starts (default: 30)
//! - `MEDIBOOK_APPOINTMENT_SCOPE`: `doctor` or `mine`, which appointments to exclude slots against (default: "doctor")
//! - `MEDIBOOK_REQUEST_TIMEOUT_SECONDS`: HTTP request timeout (default: 30)
//!
//! The `doctor` scope reads `GET /appointments/doctor/{id}`, which sees every
//! patient's bookings. Backends that only serve `GET /appointments/my` answer
//! it with 404; use `mine` against those, accepting that slots taken by other
//! patients are only caught by the booking conflict.

use std::env;

use eyre::{eyre, Result, WrapErr};
use medibook_core::{
    errors::BookingResult,
    slots::{SlotDeriver, DEFAULT_HORIZON_DAYS, DEFAULT_SLOT_INTERVAL_MINUTES},
};
use tracing::Level;
use uuid::Uuid;

use crate::api::AppointmentScope;

/// Which appointment listing is consulted when excluding taken slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Only the signed-in user's own appointments.
    Mine,
    /// Every appointment held with the doctor being booked.
    Doctor,
}

impl ScopeKind {
    pub fn scope_for(self, doctor_id: Uuid) -> AppointmentScope {
        match self {
            ScopeKind::Mine => AppointmentScope::Mine,
            ScopeKind::Doctor => AppointmentScope::Doctor(doctor_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the booking backend, without a trailing slash
    pub api_url: String,

    /// Bearer token attached to every request, if any
    pub api_token: Option<String>,

    pub log_level: Level,

    pub horizon_days: u32,

    pub slot_interval_minutes: u32,

    pub appointment_scope: ScopeKind,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl ClientConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `MEDIBOOK_API_URL` is missing, or when the horizon, interval,
    /// scope or timeout values cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("MEDIBOOK_API_URL")
            .ok_or_else(|| eyre!("MEDIBOOK_API_URL environment variable must be set"))?
            .trim_end_matches('/')
            .to_string();

        let api_token = lookup("MEDIBOOK_API_TOKEN").filter(|token| !token.trim().is_empty());

        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let horizon_days = match lookup("MEDIBOOK_HORIZON_DAYS") {
            Some(value) => value
                .trim()
                .parse()
                .wrap_err("Invalid MEDIBOOK_HORIZON_DAYS value")?,
            None => DEFAULT_HORIZON_DAYS,
        };

        let slot_interval_minutes = match lookup("MEDIBOOK_SLOT_INTERVAL_MINUTES") {
            Some(value) => value
                .trim()
                .parse()
                .wrap_err("Invalid MEDIBOOK_SLOT_INTERVAL_MINUTES value")?,
            None => DEFAULT_SLOT_INTERVAL_MINUTES,
        };

        let appointment_scope = match lookup("MEDIBOOK_APPOINTMENT_SCOPE")
            .unwrap_or_else(|| "doctor".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "doctor" => ScopeKind::Doctor,
            "mine" => ScopeKind::Mine,
            other => return Err(eyre!("Invalid MEDIBOOK_APPOINTMENT_SCOPE value: {}", other)),
        };

        let request_timeout = match lookup("MEDIBOOK_REQUEST_TIMEOUT_SECONDS") {
            Some(value) => value
                .trim()
                .parse()
                .wrap_err("Invalid MEDIBOOK_REQUEST_TIMEOUT_SECONDS value")?,
            None => 30,
        };

        Ok(Self {
            api_url,
            api_token,
            log_level,
            horizon_days,
            slot_interval_minutes,
            appointment_scope,
            request_timeout,
        })
    }

    /// Builds the slot deriver for the configured horizon and interval.
    pub fn slot_deriver(&self) -> BookingResult<SlotDeriver> {
        SlotDeriver::new(self.horizon_days, self.slot_interval_minutes)
    }
}
