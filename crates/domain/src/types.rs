//! Domain types and models
//!
//! Shapes mirror the backend REST API (Django REST Framework), so list
//! endpoints may answer either a plain array or a paginated envelope.

pub mod realtime;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Re-export realtime types for convenience
pub use realtime::{EventEnvelope, EventKind, FeedNotification, Severity, ToastNotification};

// ============================================================================
// Appointments
// ============================================================================

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

/// Appointment as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient: i64,
    pub professional: i64,
    pub patient_name: Option<String>,
    pub professional_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

/// Payload for creating an appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient: i64,
    pub professional: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update payload; unset fields are left untouched by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

/// Server-side list filters for appointments
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<i64>,
    pub professional_id: Option<i64>,
}

impl AppointmentFilter {
    /// Render the filter as query parameters, skipping unset fields.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(patient_id) = self.patient_id {
            query.push(("patient_id".to_string(), patient_id.to_string()));
        }
        if let Some(professional_id) = self.professional_id {
            query.push(("professional_id".to_string(), professional_id.to_string()));
        }
        query
    }
}

/// Request body for the availability-check endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub professional: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Availability-check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub available: bool,
}

// ============================================================================
// Patients and Professionals
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial update payload for a patient record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfessional {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Partial update payload for a professional record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfessionalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Free-text search filter used by the directory list endpoints
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub search: Option<String>,
    pub specialty: Option<String>,
}

impl SearchFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(specialty) = &self.specialty {
            query.push(("specialty".to_string(), specialty.clone()));
        }
        query
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// Aggregate appointment statistics shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: u64,
    pub scheduled: u64,
    pub confirmed: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub no_show: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Professional,
    Patient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body sent to the token endpoint.
///
/// The backend authenticates with SimpleJWT, which expects `username`; the
/// email is sent in both fields for compatibility with customized user
/// models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<Credentials> for LoginRequest {
    fn from(credentials: Credentials) -> Self {
        Self {
            username: credentials.email.clone(),
            email: credentials.email,
            password: credentials.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

// ============================================================================
// List responses
// ============================================================================

/// Paginated list envelope used by some backend endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// List endpoints answer either a plain array or a paginated envelope
/// depending on backend configuration; both shapes normalize to items.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated(Paginated<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Plain(items) => items,
            Self::Paginated(page) => page.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_status_serialization() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");

        let status: AppointmentStatus = serde_json::from_str("\"scheduled\"").unwrap();
        assert_eq!(status, AppointmentStatus::Scheduled);
        assert_eq!(status.as_str(), "scheduled");
    }

    #[test]
    fn test_appointment_filter_query() {
        let filter = AppointmentFilter {
            status: Some(AppointmentStatus::Confirmed),
            patient_id: Some(7),
            professional_id: None,
        };

        let query = filter.to_query();
        assert_eq!(query.len(), 2);
        assert_eq!(query[0], ("status".to_string(), "confirmed".to_string()));
        assert_eq!(query[1], ("patient_id".to_string(), "7".to_string()));

        assert!(AppointmentFilter::default().to_query().is_empty());
    }

    #[test]
    fn test_list_response_plain_array() {
        let json = r#"[{"id":1,"email":"a@b.com","first_name":"Ana","last_name":"Ruiz",
                        "phone_number":null,"birth_date":null,"address":null}]"#;
        let parsed: ListResponse<Patient> = serde_json::from_str(json).unwrap();
        let items = parsed.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].first_name, "Ana");
    }

    #[test]
    fn test_list_response_paginated() {
        let json = r#"{"count":1,"next":null,"previous":null,
                       "results":[{"id":2,"email":"c@d.com","first_name":"Luis",
                                   "last_name":"Gil","phone_number":null,
                                   "birth_date":null,"address":null}]}"#;
        let parsed: ListResponse<Patient> = serde_json::from_str(json).unwrap();
        let items = parsed.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }

    #[test]
    fn test_appointment_update_skips_unset_fields() {
        let update =
            AppointmentUpdate { status: Some(AppointmentStatus::Cancelled), ..Default::default() };

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, "{\"status\":\"cancelled\"}");
    }

    #[test]
    fn test_login_request_from_credentials() {
        let request: LoginRequest =
            Credentials { email: "a@b.com".to_string(), password: "secret".to_string() }.into();

        assert_eq!(request.username, "a@b.com");
        assert_eq!(request.email, "a@b.com");
    }

    #[test]
    fn test_dashboard_stats_serialization() {
        let stats = DashboardStats { total: 10, scheduled: 4, today: 2, ..Default::default() };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total\":10"));

        let back: DashboardStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
