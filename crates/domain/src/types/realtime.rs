//! Realtime event and notification types
//!
//! The push channel carries JSON envelopes of the form
//! `{"type": "...", "payload": {...}}`. The `type` field is a closed
//! enumeration; payload shape is specific to each kind and validated at the
//! consuming call site, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Event kinds carried over the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AppointmentCreated,
    AppointmentUpdated,
    AppointmentDeleted,
    AppointmentReminder,
    Notification,
}

impl EventKind {
    /// All kinds, in the order feed subscribers register them.
    pub const ALL: [EventKind; 5] = [
        EventKind::Notification,
        EventKind::AppointmentCreated,
        EventKind::AppointmentUpdated,
        EventKind::AppointmentDeleted,
        EventKind::AppointmentReminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppointmentCreated => "appointment_created",
            Self::AppointmentUpdated => "appointment_updated",
            Self::AppointmentDeleted => "appointment_deleted",
            Self::AppointmentReminder => "appointment_reminder",
            Self::Notification => "notification",
        }
    }
}

/// Wire envelope for push messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub payload: Value,
}

impl EventEnvelope {
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    /// Synthetic `notification` event used for connection lifecycle
    /// messages (connected, reconnecting).
    pub fn notification(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind: EventKind::Notification,
            payload: serde_json::json!({
                "message": message.into(),
                "severity": severity,
            }),
        }
    }
}

/// Display severity for user-facing notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient toast shown by the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastNotification {
    pub message: String,
    pub severity: Severity,
}

impl ToastNotification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self { message: message.into(), severity }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

/// Persistent entry in the notification feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedNotification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub kind: EventKind,
    pub link: Option<String>,
}

// ============================================================================
// Payload shapes
// ============================================================================

/// Appointment summary embedded in lifecycle event payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub id: i64,
    pub patient_name: String,
    pub professional_name: String,
    pub start_time: DateTime<Utc>,
}

/// Payload for `appointment_created`, `appointment_updated` and
/// `appointment_reminder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentEventPayload {
    pub appointment: AppointmentSummary,
}

/// Payload for `appointment_deleted`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDeletedPayload {
    pub appointment_id: i64,
}

/// Payload for free-form `notification` events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralNotificationPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub connected: Option<bool>,
}
