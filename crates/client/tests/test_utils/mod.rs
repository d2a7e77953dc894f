#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use medibook_client::config::{ClientConfig, ScopeKind};
use medibook_core::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::AvailabilityRecord,
    doctor::Doctor,
    medical_record::MedicalRecord,
    user::UserProfile,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::Level;
use uuid::Uuid;

// 2024-01-01 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn doctor(id: Uuid) -> Doctor {
    Doctor {
        id,
        user_id: Uuid::new_v4(),
        first_name: "Maya".to_string(),
        last_name: "Lin".to_string(),
        specialization: Some("Cardiology".to_string()),
        license_number: "LIC-100".to_string(),
        bio: None,
        phone: None,
        consultation_fee: Some("150.00".to_string()),
        years_of_experience: Some(12),
    }
}

pub fn availability(id: i64, doctor_id: Uuid, day: &str, start: &str, end: &str) -> AvailabilityRecord {
    AvailabilityRecord {
        id,
        doctor_id,
        day_of_week: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_available: true,
    }
}

pub fn appointment(
    id: i64,
    doctor_id: Uuid,
    date: NaiveDate,
    at: NaiveTime,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id,
        patient_id: Uuid::new_v4(),
        doctor_id,
        date,
        time: at,
        status,
        reason: "Chest pain".to_string(),
        notes: None,
        patient_name: "Alex Doe".to_string(),
        doctor_name: "Maya Lin".to_string(),
        created_at: Utc::now().naive_utc(),
    }
}

pub fn profile(role: &str) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        email: "alex@example.com".to_string(),
        first_name: "Alex".to_string(),
        last_name: "Doe".to_string(),
        role: role.to_string(),
        is_active: true,
        created_at: monday().and_hms_opt(8, 0, 0).unwrap(),
    }
}

pub fn medical_record(id: i64, patient_id: Uuid) -> MedicalRecord {
    MedicalRecord {
        id,
        patient_id,
        doctor_id: Uuid::new_v4(),
        title: "Blood panel".to_string(),
        diagnosis: "Low iron".to_string(),
        treatment: "Iron supplements".to_string(),
        prescription: Some("Ferrous sulfate 325mg".to_string()),
        notes: None,
        date: monday(),
        doctor_name: "Maya Lin".to_string(),
        created_at: monday().and_hms_opt(12, 0, 0).unwrap(),
    }
}

pub fn config(api_url: &str, api_token: Option<&str>) -> ClientConfig {
    ClientConfig {
        api_url: api_url.to_string(),
        api_token: api_token.map(str::to_string),
        log_level: Level::DEBUG,
        horizon_days: 14,
        slot_interval_minutes: 30,
        appointment_scope: ScopeKind::Doctor,
        request_timeout: 5,
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Stand-in booking backend answering canned responses keyed by "METHOD /path".
#[derive(Clone, Default)]
pub struct FakeBackend {
    routes: Arc<Mutex<HashMap<String, (u16, Option<Value>)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeBackend {
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), (status, Some(body)));
        self
    }

    pub fn respond_empty(&self, method: &str, path: &str, status: u16) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), (status, None));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serves on an ephemeral local port and returns the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1", addr)
    }
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().trim_start_matches("/api/v1").to_string();
    backend.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    });

    let route = backend
        .routes
        .lock()
        .unwrap()
        .get(&format!("{} {}", method, path))
        .cloned();

    match route {
        Some((status, Some(body))) => {
            (StatusCode::from_u16(status).unwrap(), Json(body)).into_response()
        }
        Some((status, None)) => StatusCode::from_u16(status).unwrap().into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response(),
    }
}
