//! # CareSync Domain
//!
//! Business domain types and models for CareSync.
//!
//! This crate contains:
//! - Domain data types (Appointment, Patient, EventEnvelope, etc.)
//! - Domain error types and Result definitions
//! - Domain constants (cache defaults, reconnect policy, API paths)
//! - Client configuration sections with built-in defaults
//!
//! ## Architecture
//! - No dependencies on other CareSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
