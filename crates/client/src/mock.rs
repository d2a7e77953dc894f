use async_trait::async_trait;
use medibook_core::{
    errors::BookingResult,
    models::{
        appointment::{Appointment, BookingRequest, UpdateStatusRequest},
        availability::{AvailabilityRecord, CreateAvailabilityRequest},
        doctor::{Doctor, DoctorSearch},
        medical_record::MedicalRecord,
        user::UserProfile,
    },
};
use mockall::mock;
use uuid::Uuid;

use crate::api::{AppointmentScope, BookingApi};

// Mock booking backend for testing
mock! {
    pub Backend {}

    #[async_trait]
    impl BookingApi for Backend {
        async fn profile(&self) -> BookingResult<UserProfile>;

        async fn get_doctor(&self, doctor_id: Uuid) -> BookingResult<Doctor>;

        async fn search_doctors(&self, search: &DoctorSearch) -> BookingResult<Vec<Doctor>>;

        async fn doctor_availability(
            &self,
            doctor_id: Uuid,
        ) -> BookingResult<Vec<AvailabilityRecord>>;

        async fn my_availability(&self) -> BookingResult<Vec<AvailabilityRecord>>;

        async fn add_availability(
            &self,
            request: &CreateAvailabilityRequest,
        ) -> BookingResult<AvailabilityRecord>;

        async fn delete_availability(&self, availability_id: i64) -> BookingResult<()>;

        async fn appointments(&self, scope: AppointmentScope) -> BookingResult<Vec<Appointment>>;

        async fn book(&self, request: &BookingRequest) -> BookingResult<Appointment>;

        async fn update_status(
            &self,
            appointment_id: i64,
            update: &UpdateStatusRequest,
        ) -> BookingResult<Appointment>;

        async fn my_records(&self) -> BookingResult<Vec<MedicalRecord>>;
    }
}
