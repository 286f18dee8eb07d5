//! Appointment service
//!
//! CRUD, status transitions and the availability check, with cached-listing
//! invalidation after every write.

use std::sync::Arc;

use caresync_common::cache::ResourceCache;
use caresync_domain::constants::{APPOINTMENTS_PATH, AVAILABILITY_CHECK_PATH};
use caresync_domain::{
    Appointment, AppointmentFilter, AppointmentStatus, AppointmentUpdate, AvailabilityQuery,
    AvailabilityResult, CareSyncError, ListResponse, NewAppointment, Result,
};
use tracing::{debug, instrument};

use super::client::ApiClient;

const CACHE_PREFIX: &str = "appointments:";

/// Appointment operations against the clinic backend
pub struct AppointmentService {
    api: Arc<ApiClient>,
    cache: ResourceCache,
}

impl AppointmentService {
    pub fn new(api: Arc<ApiClient>, cache: ResourceCache) -> Self {
        Self { api, cache }
    }

    /// List appointments, optionally narrowed by server-side filters.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let response: ListResponse<Appointment> =
            self.api.get_with_query(APPOINTMENTS_PATH, &filter.to_query()).await?;
        Ok(response.into_items())
    }

    /// Fetch one appointment by id.
    ///
    /// Goes through the list endpoint with an `id` filter: the backend's
    /// detail route rejects some roles, while the filtered listing answers
    /// for every authenticated user.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Appointment> {
        let query = vec![("id".to_string(), id.to_string())];
        let response: ListResponse<Appointment> =
            self.api.get_with_query(APPOINTMENTS_PATH, &query).await?;

        response
            .into_items()
            .into_iter()
            .find(|appointment| appointment.id == id)
            .ok_or_else(|| {
                CareSyncError::NotFound(format!("No se pudo obtener la cita con ID {id}"))
            })
    }

    /// Create an appointment.
    #[instrument(skip(self, new_appointment))]
    pub async fn create(&self, new_appointment: &NewAppointment) -> Result<Appointment> {
        let created = self.api.post(APPOINTMENTS_PATH, new_appointment).await?;
        self.invalidate();
        Ok(created)
    }

    /// Apply a partial update.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: &AppointmentUpdate) -> Result<Appointment> {
        let path = format!("{APPOINTMENTS_PATH}{id}/");
        let updated = self.api.patch(&path, update).await?;
        self.invalidate();
        Ok(updated)
    }

    /// Mark an appointment confirmed.
    pub async fn confirm(&self, id: i64) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::Confirmed).await
    }

    /// Mark an appointment cancelled.
    pub async fn cancel(&self, id: i64) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::Cancelled).await
    }

    /// Mark an appointment completed.
    pub async fn complete(&self, id: i64) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::Completed).await
    }

    async fn transition(&self, id: i64, status: AppointmentStatus) -> Result<Appointment> {
        let update = AppointmentUpdate { status: Some(status), ..Default::default() };
        self.update(id, &update).await
    }

    /// Ask the backend whether a professional is free over a window.
    #[instrument(skip(self, query))]
    pub async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityResult> {
        let params = vec![
            ("professional_id".to_string(), query.professional.to_string()),
            ("start_time".to_string(), query.start_time.to_rfc3339()),
            ("end_time".to_string(), query.end_time.to_rfc3339()),
        ];
        self.api.get_with_query(AVAILABILITY_CHECK_PATH, &params).await
    }

    fn invalidate(&self) {
        let removed = self.cache.remove_by_prefix(CACHE_PREFIX);
        if removed > 0 {
            debug!(removed, "invalidated cached appointment listings");
        }
    }
}
