mod test_utils;

use medibook_client::api::{AppointmentScope, BookingApi, HttpBookingApi};
use medibook_core::{
    errors::BookingError,
    models::{
        appointment::{AppointmentStatus, BookingRequest, UpdateStatusRequest},
        availability::{AvailabilityWindow, CreateAvailabilityRequest},
        doctor::DoctorSearch,
        slot::Slot,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{
    FakeBackend, appointment, config, doctor, medical_record, monday, profile, time,
};

async fn connect(backend: &FakeBackend, token: Option<&str>) -> HttpBookingApi {
    let url = backend.spawn().await;
    HttpBookingApi::new(&config(&url, token)).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_get_doctor_sends_bearer_token() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        &format!("/doctors/{}", doctor_id),
        200,
        serde_json::to_value(doctor(doctor_id)).unwrap(),
    );
    let api = connect(&backend, Some("secret-token")).await;

    let fetched = api.get_doctor(doctor_id).await.unwrap();

    assert_eq!(fetched.id, doctor_id);
    assert_eq!(fetched.display_name(), "Dr. Maya Lin");
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn test_requests_without_token_have_no_authorization() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        &format!("/availability/doctor/{}", doctor_id),
        200,
        json!([]),
    );
    let api = connect(&backend, None).await;

    api.doctor_availability(doctor_id).await.unwrap();

    assert_eq!(backend.requests()[0].authorization, None);
}

#[tokio::test]
async fn test_doctor_availability_parses_records() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        &format!("/availability/doctor/{}", doctor_id),
        200,
        json!([
            { "id": 1, "doctor_id": doctor_id, "day_of_week": "monday",
              "start_time": "09:00:00", "end_time": "12:00:00", "is_available": true },
            { "id": 2, "doctor_id": doctor_id, "day_of_week": "friday",
              "start_time": "14:00:00", "end_time": "16:00:00", "is_available": false }
        ]),
    );
    let api = connect(&backend, None).await;

    let records = api.doctor_availability(doctor_id).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].start_time, "09:00:00");
    assert!(!records[1].is_available);
}

#[tokio::test]
async fn test_search_doctors_passes_query() {
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        "/doctors/search",
        200,
        json!([serde_json::to_value(doctor(Uuid::new_v4())).unwrap()]),
    );
    let api = connect(&backend, None).await;
    let search = DoctorSearch {
        name: None,
        specialization: Some("Cardiology".to_string()),
    };

    let doctors = api.search_doctors(&search).await.unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(
        backend.requests()[0].query.as_deref(),
        Some("specialization=Cardiology")
    );
}

#[tokio::test]
async fn test_appointments_scope_selects_endpoint() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend
        .respond(
            "GET",
            "/appointments/my",
            200,
            json!([serde_json::to_value(appointment(
                1,
                doctor_id,
                monday(),
                time(9, 0),
                AppointmentStatus::Pending
            ))
            .unwrap()]),
        )
        .respond(
            "GET",
            &format!("/appointments/doctor/{}", doctor_id),
            200,
            json!([]),
        );
    let api = connect(&backend, None).await;

    let mine = api.appointments(AppointmentScope::Mine).await.unwrap();
    let doctors = api
        .appointments(AppointmentScope::Doctor(doctor_id))
        .await
        .unwrap();

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].time, time(9, 0));
    assert!(doctors.is_empty());
    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/appointments/my".to_string(),
            format!("/appointments/doctor/{}", doctor_id)
        ]
    );
}

#[tokio::test]
async fn test_book_posts_request_body() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "POST",
        "/appointments",
        201,
        serde_json::to_value(appointment(
            42,
            doctor_id,
            monday(),
            time(9, 30),
            AppointmentStatus::Pending,
        ))
        .unwrap(),
    );
    let api = connect(&backend, Some("token")).await;
    let request =
        BookingRequest::for_slot(doctor_id, &Slot::new(monday(), time(9, 30)), "Chest pain")
            .unwrap();

    let booked = api.book(&request).await.unwrap();

    assert_eq!(booked.id, 42);
    let sent = &backend.requests()[0];
    assert_eq!(sent.method, "POST");
    assert_eq!(
        sent.json(),
        json!({
            "doctor_id": doctor_id,
            "date": "2024-01-01",
            "time": "09:30",
            "reason": "Chest pain"
        })
    );
}

#[tokio::test]
async fn test_conflict_status_maps_to_recoverable_error() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "POST",
        "/appointments",
        409,
        json!({ "detail": "This time slot is no longer available" }),
    );
    let api = connect(&backend, None).await;
    let request =
        BookingRequest::for_slot(doctor_id, &Slot::new(monday(), time(9, 0)), "Rash").unwrap();

    let err = api.book(&request).await.unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(
        err.to_string(),
        "Booking conflict: This time slot is no longer available"
    );
}

#[tokio::test]
async fn test_missing_doctor_maps_to_not_found() {
    let backend = FakeBackend::default();
    let api = connect(&backend, None).await;

    let err = api.get_doctor(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, BookingError::NotFound(detail) if detail == "Not Found"));
}

#[tokio::test]
async fn test_field_errors_map_to_validation() {
    let backend = FakeBackend::default();
    backend.respond(
        "POST",
        "/availability",
        422,
        json!({ "detail": [
            { "loc": ["body", "start_time"], "msg": "Input should be a valid time" },
            { "loc": ["body", "end_time"], "msg": "Field required" }
        ] }),
    );
    let api = connect(&backend, None).await;
    let window = AvailabilityWindow::parse("monday", "09:00", "10:00").unwrap();

    let err = api
        .add_availability(&CreateAvailabilityRequest::from(window))
        .await
        .unwrap_err();

    match err {
        BookingError::Validation(detail) => assert_eq!(
            detail,
            "Input should be a valid time; Field required"
        ),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_maps_to_backend() {
    let backend = FakeBackend::default();
    backend.respond("GET", "/availability/my", 500, json!({ "detail": "boom" }));
    let api = connect(&backend, None).await;

    let err = api.my_availability().await.unwrap_err();

    assert!(matches!(err, BookingError::Backend(_)));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_delete_availability_accepts_no_content() {
    let backend = FakeBackend::default();
    backend.respond_empty("DELETE", "/availability/5", 204);
    let api = connect(&backend, None).await;

    api.delete_availability(5).await.unwrap();

    assert_eq!(backend.requests()[0].method, "DELETE");
}

#[tokio::test]
async fn test_update_status_patches_status() {
    let doctor_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "PATCH",
        "/appointments/9/status",
        200,
        serde_json::to_value(appointment(
            9,
            doctor_id,
            monday(),
            time(10, 0),
            AppointmentStatus::Cancelled,
        ))
        .unwrap(),
    );
    let api = connect(&backend, None).await;

    let updated = api
        .update_status(9, &UpdateStatusRequest::to_status(AppointmentStatus::Cancelled))
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::Cancelled);
    assert_eq!(backend.requests()[0].json(), json!({ "status": "cancelled" }));
}

#[tokio::test]
async fn test_update_status_sends_notes() {
    let doctor_id = Uuid::new_v4();
    let mut completed = appointment(4, doctor_id, monday(), time(11, 0), AppointmentStatus::Completed);
    completed.notes = Some("Prescribed rest".to_string());
    let backend = FakeBackend::default();
    backend.respond(
        "PATCH",
        "/appointments/4/status",
        200,
        serde_json::to_value(&completed).unwrap(),
    );
    let api = connect(&backend, Some("token")).await;
    let update = UpdateStatusRequest::to_status(AppointmentStatus::Completed)
        .with_notes(Some("  Prescribed rest "));

    let updated = api.update_status(4, &update).await.unwrap();

    assert_eq!(updated.notes.as_deref(), Some("Prescribed rest"));
    assert_eq!(
        backend.requests()[0].json(),
        json!({ "status": "completed", "notes": "Prescribed rest" })
    );
}

#[tokio::test]
async fn test_profile_reads_current_user() {
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        "/auth/me",
        200,
        serde_json::to_value(profile("patient")).unwrap(),
    );
    let api = connect(&backend, Some("secret-token")).await;

    let me = api.profile().await.unwrap();

    assert_eq!(me.full_name(), "Alex Doe");
    assert_eq!(me.role, "patient");
    assert_eq!(
        backend.requests()[0].authorization.as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn test_my_records_parses_backend_payload() {
    let patient_id = Uuid::new_v4();
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        "/medical-records/my",
        200,
        json!([
            {
                "id": 3,
                "patient_id": patient_id,
                "doctor_id": Uuid::new_v4(),
                "title": "Annual physical",
                "diagnosis": "Healthy",
                "treatment": "None",
                "prescription": null,
                "notes": "Return next year",
                "date": "2024-01-01",
                "doctor_name": "Maya Lin",
                "created_at": "2024-01-01T10:00:00.123456"
            },
            serde_json::to_value(medical_record(2, patient_id)).unwrap()
        ]),
    );
    let api = connect(&backend, None).await;

    let records = api.my_records().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Annual physical");
    assert_eq!(records[0].prescription, None);
    assert_eq!(records[0].notes.as_deref(), Some("Return next year"));
    assert_eq!(records[1].id, 2);
}

#[tokio::test]
async fn test_records_forbidden_for_doctors() {
    let backend = FakeBackend::default();
    backend.respond(
        "GET",
        "/medical-records/my",
        403,
        json!({ "detail": "Only patients can access medical records" }),
    );
    let api = connect(&backend, None).await;

    let err = api.my_records().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Authorization error: Only patients can access medical records"
    );
}

#[tokio::test]
async fn test_missing_doctor_listing_suggests_mine_scope() {
    let backend = FakeBackend::default();
    let api = connect(&backend, None).await;

    let err = api
        .appointments(AppointmentScope::Doctor(Uuid::new_v4()))
        .await
        .unwrap_err();

    match err {
        BookingError::NotFound(detail) => {
            assert!(detail.starts_with("Not Found: "));
            assert!(detail.contains("MEDIBOOK_APPOINTMENT_SCOPE=mine"));
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_a_backend_error() {
    // Nothing listens on port 9 of the loopback interface.
    let api = HttpBookingApi::new(&config("http://127.0.0.1:9", None)).unwrap();

    let err = api.my_availability().await.unwrap_err();

    assert!(matches!(err, BookingError::Backend(_)));
}
