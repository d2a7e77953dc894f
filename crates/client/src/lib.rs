//! # MediBook Client
//!
//! Client side of the appointment-booking service. It reads availability and
//! appointments from the REST backend, derives bookable slots with
//! [`medibook_core::slots::SlotDeriver`], and submits bookings.
//!
//! ## Architecture
//!
//! - **Api**: the [`api::BookingApi`] seam and its reqwest implementation
//! - **Response**: status-code to error mapping for backend replies
//! - **Flow**: load-derive-book sequence with conflict handling
//! - **Commands**: CLI command parsing and text rendering
//! - **Config**: environment configuration

/// REST collaborator for doctors, availability and appointments
pub mod api;
/// CLI commands and output formatting
pub mod commands;
/// Environment configuration
pub mod config;
/// Load, derive and book sequence
pub mod flow;
/// Mock booking backend for tests
pub mod mock;
/// Mapping of backend responses onto domain errors
pub mod response;

use eyre::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global tracing subscriber at the given level.
pub fn init_logging(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
