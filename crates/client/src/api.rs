//! # Booking Backend
//!
//! The REST collaborator the booking flow talks to. [`BookingApi`] is the
//! seam; [`HttpBookingApi`] implements it with reqwest.
//!
//! ## Endpoints
//!
//! Paths are relative to the configured base URL:
//!
//! - `GET    /auth/me`
//! - `GET    /doctors/{id}`
//! - `GET    /doctors/search?name=&specialization=`
//! - `GET    /availability/doctor/{doctor_id}`
//! - `GET    /availability/my`
//! - `POST   /availability`
//! - `DELETE /availability/{id}`
//! - `GET    /appointments/my`
//! - `GET    /appointments/doctor/{doctor_id}`
//! - `POST   /appointments`
//! - `PATCH  /appointments/{id}/status`
//! - `GET    /medical-records/my`

use std::time::Duration;

use async_trait::async_trait;
use medibook_core::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, BookingRequest, UpdateStatusRequest},
        availability::{AvailabilityRecord, CreateAvailabilityRequest},
        doctor::{Doctor, DoctorSearch},
        medical_record::MedicalRecord,
        user::UserProfile,
    },
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    response::{expect_success, read_json, transport_error},
};

/// Which appointment listing to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    /// The signed-in user's appointments, as patient or as doctor.
    Mine,
    /// All appointments held with one doctor.
    Doctor(Uuid),
}

#[async_trait]
pub trait BookingApi: Send + Sync {
    /// The account the configured token belongs to.
    async fn profile(&self) -> BookingResult<UserProfile>;

    async fn get_doctor(&self, doctor_id: Uuid) -> BookingResult<Doctor>;

    async fn search_doctors(&self, search: &DoctorSearch) -> BookingResult<Vec<Doctor>>;

    async fn doctor_availability(&self, doctor_id: Uuid) -> BookingResult<Vec<AvailabilityRecord>>;

    /// The signed-in doctor's own availability.
    async fn my_availability(&self) -> BookingResult<Vec<AvailabilityRecord>>;

    async fn add_availability(
        &self,
        request: &CreateAvailabilityRequest,
    ) -> BookingResult<AvailabilityRecord>;

    async fn delete_availability(&self, availability_id: i64) -> BookingResult<()>;

    async fn appointments(&self, scope: AppointmentScope) -> BookingResult<Vec<Appointment>>;

    async fn book(&self, request: &BookingRequest) -> BookingResult<Appointment>;

    /// Changes status and/or notes of an existing appointment.
    async fn update_status(
        &self,
        appointment_id: i64,
        update: &UpdateStatusRequest,
    ) -> BookingResult<Appointment>;

    /// The signed-in patient's medical records, newest first.
    async fn my_records(&self) -> BookingResult<Vec<MedicalRecord>>;
}

pub struct HttpBookingApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBookingApi {
    pub fn new(config: &ClientConfig) -> BookingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}{}", method, self.base_url, path);
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> BookingResult<T> {
        let response = builder.send().await.map_err(transport_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn profile(&self) -> BookingResult<UserProfile> {
        self.fetch(self.request(Method::GET, "/auth/me")).await
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> BookingResult<Doctor> {
        self.fetch(self.request(Method::GET, &format!("/doctors/{}", doctor_id)))
            .await
    }

    async fn search_doctors(&self, search: &DoctorSearch) -> BookingResult<Vec<Doctor>> {
        self.fetch(self.request(Method::GET, "/doctors/search").query(search))
            .await
    }

    async fn doctor_availability(&self, doctor_id: Uuid) -> BookingResult<Vec<AvailabilityRecord>> {
        self.fetch(self.request(Method::GET, &format!("/availability/doctor/{}", doctor_id)))
            .await
    }

    async fn my_availability(&self) -> BookingResult<Vec<AvailabilityRecord>> {
        self.fetch(self.request(Method::GET, "/availability/my")).await
    }

    async fn add_availability(
        &self,
        request: &CreateAvailabilityRequest,
    ) -> BookingResult<AvailabilityRecord> {
        self.fetch(self.request(Method::POST, "/availability").json(request))
            .await
    }

    async fn delete_availability(&self, availability_id: i64) -> BookingResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/availability/{}", availability_id))
            .send()
            .await
            .map_err(transport_error)?;
        expect_success(response).await?;
        Ok(())
    }

    async fn appointments(&self, scope: AppointmentScope) -> BookingResult<Vec<Appointment>> {
        let path = match scope {
            AppointmentScope::Mine => "/appointments/my".to_string(),
            AppointmentScope::Doctor(doctor_id) => format!("/appointments/doctor/{}", doctor_id),
        };
        self.fetch(self.request(Method::GET, &path))
            .await
            .map_err(|err| match (scope, err) {
                (AppointmentScope::Doctor(_), BookingError::NotFound(detail)) => {
                    BookingError::NotFound(format!(
                        "{}: this backend has no per-doctor appointment listing, \
                         set MEDIBOOK_APPOINTMENT_SCOPE=mine",
                        detail
                    ))
                }
                (_, err) => err,
            })
    }

    async fn book(&self, request: &BookingRequest) -> BookingResult<Appointment> {
        self.fetch(self.request(Method::POST, "/appointments").json(request))
            .await
    }

    async fn update_status(
        &self,
        appointment_id: i64,
        update: &UpdateStatusRequest,
    ) -> BookingResult<Appointment> {
        self.fetch(
            self.request(
                Method::PATCH,
                &format!("/appointments/{}/status", appointment_id),
            )
            .json(update),
        )
        .await
    }

    async fn my_records(&self) -> BookingResult<Vec<MedicalRecord>> {
        self.fetch(self.request(Method::GET, "/medical-records/my")).await
    }
}
