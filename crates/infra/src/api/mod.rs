//! Typed services over the clinic REST API
//!
//! [`client::ApiClient`] owns the HTTP plumbing (base URL, bearer auth,
//! JSON envelopes); the service types layer the domain endpoints on top
//! of it and keep the shared [`caresync_common::cache::ResourceCache`]
//! coherent after writes.

pub mod appointments;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod directory;

pub use appointments::AppointmentService;
pub use auth::{AuthService, SessionTokens};
pub use client::{ApiClient, ApiClientConfig};
pub use dashboard::DashboardService;
pub use directory::{PatientService, ProfessionalService};
