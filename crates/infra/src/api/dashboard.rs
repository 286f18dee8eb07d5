//! Dashboard service
//!
//! Prefers the backend's aggregate endpoints and falls back to computing
//! the same answers from the appointment listing when a deployment does
//! not expose them (older backends answer 404 on both routes).

use std::sync::Arc;

use caresync_domain::constants::{DASHBOARD_STATS_PATH, UPCOMING_APPOINTMENTS_PATH};
use caresync_domain::{
    Appointment, AppointmentFilter, AppointmentStatus, CareSyncError, DashboardStats,
    ListResponse, Result,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::{info, instrument};

use super::appointments::AppointmentService;
use super::client::ApiClient;

/// Aggregate views over the appointment book
pub struct DashboardService {
    api: Arc<ApiClient>,
    appointments: Arc<AppointmentService>,
}

impl DashboardService {
    pub fn new(api: Arc<ApiClient>, appointments: Arc<AppointmentService>) -> Self {
        Self { api, appointments }
    }

    /// Appointment statistics: per-status counts plus today / this week /
    /// this month totals.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats> {
        match self.api.get(DASHBOARD_STATS_PATH).await {
            Ok(stats) => Ok(stats),
            Err(CareSyncError::NotFound(_)) => {
                info!("dashboard stats endpoint missing; computing from appointment listing");
                let appointments =
                    self.appointments.list(&AppointmentFilter::default()).await?;
                Ok(compute_stats(&appointments, Utc::now()))
            }
            Err(err) => Err(err),
        }
    }

    /// The next `limit` appointments, soonest first.
    #[instrument(skip(self))]
    pub async fn upcoming_appointments(&self, limit: usize) -> Result<Vec<Appointment>> {
        let query = vec![("limit".to_string(), limit.to_string())];
        let fetched: Result<ListResponse<Appointment>> =
            self.api.get_with_query(UPCOMING_APPOINTMENTS_PATH, &query).await;

        match fetched {
            Ok(response) => Ok(response.into_items()),
            Err(CareSyncError::NotFound(_)) => {
                info!("upcoming-appointments endpoint missing; filtering the full listing");
                let mut appointments =
                    self.appointments.list(&AppointmentFilter::default()).await?;
                let now = Utc::now();
                appointments.retain(|appointment| appointment.start_time > now);
                appointments.sort_by_key(|appointment| appointment.start_time);
                appointments.truncate(limit);
                Ok(appointments)
            }
            Err(err) => Err(err),
        }
    }
}

/// Derive dashboard statistics from a full appointment listing.
///
/// The week window starts on Monday; both week and month are calendar
/// windows around `now`, not rolling ranges.
fn compute_stats(appointments: &[Appointment], now: DateTime<Utc>) -> DashboardStats {
    let today = now.date_naive();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_end = week_start + Duration::days(7);

    let mut stats = DashboardStats { total: appointments.len() as u64, ..Default::default() };

    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Scheduled => stats.scheduled += 1,
            AppointmentStatus::Confirmed => stats.confirmed += 1,
            AppointmentStatus::Completed => stats.completed += 1,
            AppointmentStatus::Cancelled => stats.cancelled += 1,
            AppointmentStatus::NoShow => stats.no_show += 1,
        }

        let date = appointment.start_time.date_naive();
        if date == today {
            stats.today += 1;
        }
        if date >= week_start && date < week_end {
            stats.this_week += 1;
        }
        if date.year() == today.year() && date.month() == today.month() {
            stats.this_month += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use caresync_core::AccessTokenProvider;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::client::ApiClientConfig;
    use super::*;
    use caresync_common::cache::ResourceCache;
    use caresync_domain::constants::APPOINTMENTS_PATH;

    struct StaticTokens;

    impl AccessTokenProvider for StaticTokens {
        fn access_token(&self) -> Option<String> {
            Some("test-token".to_string())
        }
    }

    fn service(server: &MockServer) -> DashboardService {
        let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
        let api = Arc::new(ApiClient::new(config, Arc::new(StaticTokens)).unwrap());
        let appointments =
            Arc::new(AppointmentService::new(api.clone(), ResourceCache::new()));
        DashboardService::new(api, appointments)
    }

    fn appointment_at(status: AppointmentStatus, start: &str) -> Appointment {
        Appointment {
            id: 0,
            patient: 1,
            professional: 2,
            patient_name: None,
            professional_name: None,
            start_time: start.parse().unwrap(),
            end_time: start.parse().unwrap(),
            reason: "Consulta".to_string(),
            notes: None,
            status,
        }
    }

    fn appointment_json(id: i64, status: &str, start: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patient": 1,
            "professional": 2,
            "patient_name": null,
            "professional_name": null,
            "start_time": start,
            "end_time": start,
            "reason": "Consulta",
            "notes": null,
            "status": status,
        })
    }

    #[test]
    fn test_compute_stats_counts_calendar_windows() {
        // 2026-03-18 is a Wednesday, so the week runs Mon Mar 16 to Sun Mar 22.
        let now: DateTime<Utc> = "2026-03-18T12:00:00Z".parse().unwrap();
        let appointments = vec![
            appointment_at(AppointmentStatus::Scheduled, "2026-03-18T10:00:00Z"),
            appointment_at(AppointmentStatus::Confirmed, "2026-03-16T09:00:00Z"),
            appointment_at(AppointmentStatus::Scheduled, "2026-03-21T09:00:00Z"),
            appointment_at(AppointmentStatus::Completed, "2026-03-02T09:00:00Z"),
            appointment_at(AppointmentStatus::Cancelled, "2026-02-10T09:00:00Z"),
        ];

        let stats = compute_stats(&appointments, now);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.scheduled, 2);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.no_show, 0);
        assert_eq!(stats.today, 1);
        assert_eq!(stats.this_week, 3);
        assert_eq!(stats.this_month, 4);
    }

    #[test]
    fn test_compute_stats_week_starts_on_monday() {
        // Sunday still belongs to the week that began the previous Monday.
        let now: DateTime<Utc> = "2026-03-22T08:00:00Z".parse().unwrap();
        let appointments = vec![
            appointment_at(AppointmentStatus::Scheduled, "2026-03-16T09:00:00Z"),
            appointment_at(AppointmentStatus::Scheduled, "2026-03-15T09:00:00Z"),
        ];

        let stats = compute_stats(&appointments, now);

        assert_eq!(stats.this_week, 1);
    }

    #[tokio::test]
    async fn test_stats_prefers_server_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DASHBOARD_STATS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 12, "scheduled": 4, "confirmed": 3, "completed": 3,
                "cancelled": 1, "no_show": 1, "today": 2, "this_week": 6,
                "this_month": 10,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let stats = service(&server).stats().await.unwrap();

        assert_eq!(stats.total, 12);
        assert_eq!(stats.this_week, 6);
    }

    #[tokio::test]
    async fn test_stats_computed_when_endpoint_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DASHBOARD_STATS_PATH))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(APPOINTMENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                appointment_json(1, "scheduled", "2030-06-01T10:00:00Z"),
                appointment_json(2, "confirmed", "2030-06-02T10:00:00Z"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let stats = service(&server).stats().await.unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.confirmed, 1);
    }

    #[tokio::test]
    async fn test_stats_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DASHBOARD_STATS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = service(&server).stats().await;

        assert!(matches!(result, Err(CareSyncError::Server(_))));
    }

    #[tokio::test]
    async fn test_upcoming_passes_limit_to_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPCOMING_APPOINTMENTS_PATH))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                appointment_json(1, "scheduled", "2030-06-01T10:00:00Z"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let upcoming = service(&server).upcoming_appointments(3).await.unwrap();

        assert_eq!(upcoming.len(), 1);
    }

    #[tokio::test]
    async fn test_upcoming_falls_back_to_filtered_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPCOMING_APPOINTMENTS_PATH))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(APPOINTMENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                appointment_json(1, "completed", "2020-01-01T10:00:00Z"),
                appointment_json(2, "scheduled", "2030-06-03T10:00:00Z"),
                appointment_json(3, "scheduled", "2030-06-01T10:00:00Z"),
                appointment_json(4, "scheduled", "2030-06-02T10:00:00Z"),
            ])))
            .mount(&server)
            .await;

        let upcoming = service(&server).upcoming_appointments(2).await.unwrap();

        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].id, 3);
        assert_eq!(upcoming[1].id, 4);
    }
}
