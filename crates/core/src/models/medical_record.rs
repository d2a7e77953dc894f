use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record written by a doctor into a patient's history. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub title: String,
    pub diagnosis: String,
    pub treatment: String,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub doctor_name: String,
    pub created_at: NaiveDateTime,
}
