//! Patient and professional directory services
//!
//! Both follow the same shape: list with an optional search filter, fetch
//! by id, create, partial update, and cached-listing invalidation on write.

use std::sync::Arc;

use caresync_common::cache::ResourceCache;
use caresync_domain::constants::{PATIENTS_PATH, PROFESSIONALS_PATH};
use caresync_domain::{
    ListResponse, NewPatient, NewProfessional, Patient, PatientUpdate, Professional,
    ProfessionalUpdate, Result, SearchFilter,
};
use tracing::{debug, instrument};

use super::client::ApiClient;

const PATIENTS_CACHE_PREFIX: &str = "patients:";
const PROFESSIONALS_CACHE_PREFIX: &str = "professionals:";

/// Patient directory operations
pub struct PatientService {
    api: Arc<ApiClient>,
    cache: ResourceCache,
}

impl PatientService {
    pub fn new(api: Arc<ApiClient>, cache: ResourceCache) -> Self {
        Self { api, cache }
    }

    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &SearchFilter) -> Result<Vec<Patient>> {
        let response: ListResponse<Patient> =
            self.api.get_with_query(PATIENTS_PATH, &filter.to_query()).await?;
        Ok(response.into_items())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Patient> {
        let path = format!("{PATIENTS_PATH}{id}/");
        self.api.get(&path).await
    }

    #[instrument(skip(self, new_patient))]
    pub async fn create(&self, new_patient: &NewPatient) -> Result<Patient> {
        let created = self.api.post(PATIENTS_PATH, new_patient).await?;
        self.invalidate();
        Ok(created)
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: &PatientUpdate) -> Result<Patient> {
        let path = format!("{PATIENTS_PATH}{id}/");
        let updated = self.api.patch(&path, update).await?;
        self.invalidate();
        Ok(updated)
    }

    fn invalidate(&self) {
        let removed = self.cache.remove_by_prefix(PATIENTS_CACHE_PREFIX);
        if removed > 0 {
            debug!(removed, "invalidated cached patient listings");
        }
    }
}

/// Professional directory operations
pub struct ProfessionalService {
    api: Arc<ApiClient>,
    cache: ResourceCache,
}

impl ProfessionalService {
    pub fn new(api: Arc<ApiClient>, cache: ResourceCache) -> Self {
        Self { api, cache }
    }

    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &SearchFilter) -> Result<Vec<Professional>> {
        let response: ListResponse<Professional> =
            self.api.get_with_query(PROFESSIONALS_PATH, &filter.to_query()).await?;
        Ok(response.into_items())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Professional> {
        let path = format!("{PROFESSIONALS_PATH}{id}/");
        self.api.get(&path).await
    }

    #[instrument(skip(self, new_professional))]
    pub async fn create(&self, new_professional: &NewProfessional) -> Result<Professional> {
        let created = self.api.post(PROFESSIONALS_PATH, new_professional).await?;
        self.invalidate();
        Ok(created)
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: &ProfessionalUpdate) -> Result<Professional> {
        let path = format!("{PROFESSIONALS_PATH}{id}/");
        let updated = self.api.patch(&path, update).await?;
        self.invalidate();
        Ok(updated)
    }

    fn invalidate(&self) {
        let removed = self.cache.remove_by_prefix(PROFESSIONALS_CACHE_PREFIX);
        if removed > 0 {
            debug!(removed, "invalidated cached professional listings");
        }
    }
}
