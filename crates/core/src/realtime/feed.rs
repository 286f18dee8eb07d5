//! In-memory notification feed fed by push events.
//!
//! [`NotificationFeed`] subscribes to every event kind on an
//! [`EventStreamClient`] and turns the payloads into user-facing feed
//! entries and toasts, with the Spanish copy the product ships. Entries
//! accumulate newest first until marked read; free-form `notification`
//! events only toast and never enter the feed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use caresync_domain::realtime::{
    AppointmentEventPayload, AppointmentSummary, GeneralNotificationPayload,
};
use caresync_domain::{EventKind, FeedNotification, Severity, ToastNotification};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::notify_ports::Notifier;
use crate::realtime::client::EventStreamClient;
use crate::realtime::registry::SubscriptionId;

/// Dates render the way `es-ES` does: unpadded day and month.
fn format_date(at: DateTime<Utc>) -> String {
    at.format("%-d/%-m/%Y").to_string()
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// Accumulates push events into a reviewable notification list.
///
/// One feed is attached to one client at a time; attaching is idempotent
/// and detaching removes exactly the registrations the feed created, so
/// other listeners on the same client are untouched.
pub struct NotificationFeed {
    entries: Mutex<Vec<FeedNotification>>,
    connected: AtomicBool,
    notifier: Arc<dyn Notifier>,
    subscriptions: Mutex<Vec<(EventKind, SubscriptionId)>>,
}

impl NotificationFeed {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
            notifier,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe this feed to every event kind on `client`. Calling it
    /// again while attached is a no-op.
    pub fn attach(self: &Arc<Self>, client: &EventStreamClient) {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if !subscriptions.is_empty() {
            debug!("notification feed already attached");
            return;
        }
        for kind in EventKind::ALL {
            let feed = Arc::clone(self);
            let id = client.subscribe(kind, move |payload| feed.record(kind, payload));
            subscriptions.push((kind, id));
        }
    }

    /// Remove this feed's registrations from `client`. Recorded entries
    /// are kept.
    pub fn detach(&self, client: &EventStreamClient) {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        for (kind, id) in subscriptions.drain(..) {
            client.unsubscribe(kind, id);
        }
    }

    /// Snapshot of the feed, newest first.
    pub fn notifications(&self) -> Vec<FeedNotification> {
        self.entries.lock().unwrap().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.lock().unwrap().iter().filter(|entry| !entry.read).count()
    }

    /// Whether the server currently reports the realtime link as up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Mark one entry read. Unknown ids are ignored.
    pub fn mark_read(&self, id: Uuid) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) {
            entry.read = true;
        }
    }

    pub fn mark_all_read(&self) {
        let mut entries = self.entries.lock().unwrap();
        for entry in entries.iter_mut() {
            entry.read = true;
        }
    }

    /// Route one event payload to its handler.
    fn record(&self, kind: EventKind, payload: &Value) {
        match kind {
            EventKind::AppointmentCreated => self.on_created(payload),
            EventKind::AppointmentUpdated => self.on_updated(payload),
            EventKind::AppointmentDeleted => self.on_deleted(),
            EventKind::AppointmentReminder => self.on_reminder(payload),
            EventKind::Notification => self.on_notification(payload),
        }
    }

    fn on_created(&self, payload: &Value) {
        let Some(appointment) = parse_appointment(EventKind::AppointmentCreated, payload) else {
            return;
        };
        let message = format!(
            "Se ha creado una nueva cita para {} con {} para el {}",
            appointment.patient_name,
            appointment.professional_name,
            format_date(appointment.start_time)
        );
        self.push_entry(
            EventKind::AppointmentCreated,
            "Nueva cita creada",
            &message,
            Some(format!("/appointments/{}", appointment.id)),
        );
        self.notifier.notify(ToastNotification::success(message));
    }

    fn on_updated(&self, payload: &Value) {
        let Some(appointment) = parse_appointment(EventKind::AppointmentUpdated, payload) else {
            return;
        };
        let message = format!(
            "La cita con {} para el {} ha sido actualizada",
            appointment.professional_name,
            format_date(appointment.start_time)
        );
        self.push_entry(
            EventKind::AppointmentUpdated,
            "Cita actualizada",
            &message,
            Some(format!("/appointments/{}", appointment.id)),
        );
        self.notifier.notify(ToastNotification::info(message));
    }

    /// Deletions always record; the payload carries nothing the entry
    /// needs.
    fn on_deleted(&self) {
        let message = "Una cita ha sido cancelada";
        self.push_entry(EventKind::AppointmentDeleted, "Cita cancelada", message, None);
        self.notifier.notify(ToastNotification::warning(message));
    }

    fn on_reminder(&self, payload: &Value) {
        let Some(appointment) = parse_appointment(EventKind::AppointmentReminder, payload) else {
            return;
        };
        let message = format!(
            "Recordatorio: Tiene una cita con {} mañana a las {}",
            appointment.professional_name,
            format_time(appointment.start_time)
        );
        self.push_entry(
            EventKind::AppointmentReminder,
            "Recordatorio de cita",
            &message,
            Some(format!("/appointments/{}", appointment.id)),
        );
        self.notifier.notify(ToastNotification::info(message));
    }

    /// Free-form notices toast and may update the connection flag, but
    /// never become feed entries.
    fn on_notification(&self, payload: &Value) {
        let notice = match serde_json::from_value::<GeneralNotificationPayload>(payload.clone()) {
            Ok(notice) => notice,
            Err(err) => {
                warn!(error = %err, "discarding malformed notification payload");
                return;
            }
        };
        if let Some(message) = notice.message.filter(|message| !message.is_empty()) {
            let severity = notice.severity.unwrap_or(Severity::Info);
            self.notifier.notify(ToastNotification::new(message, severity));
        }
        if let Some(connected) = notice.connected {
            self.connected.store(connected, Ordering::SeqCst);
            info!(connected, "realtime connection flag updated");
        }
    }

    fn push_entry(&self, kind: EventKind, title: &str, message: &str, link: Option<String>) {
        let entry = FeedNotification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            read: false,
            kind,
            link,
        };
        debug!(kind = kind.as_str(), title, "feed notification recorded");
        self.entries.lock().unwrap().insert(0, entry);
    }
}

fn parse_appointment(kind: EventKind, payload: &Value) -> Option<AppointmentSummary> {
    match serde_json::from_value::<AppointmentEventPayload>(payload.clone()) {
        Ok(event) => Some(event.appointment),
        Err(err) => {
            warn!(kind = kind.as_str(), error = %err, "discarding malformed appointment payload");
            None
        }
    }
}
