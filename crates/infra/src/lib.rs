//! # CareSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client and typed API services
//! - Authentication and session persistence
//! - WebSocket push transport and availability probe
//! - Cache maintenance and configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `caresync-core`
//! - Depends on `caresync-common`, `caresync-domain` and `caresync-core`
//! - Contains all "impure" code (network, filesystem, clocks)

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod realtime;
pub mod session;

// Re-export commonly used items
pub use api::*;
pub use cache::*;
pub use errors::*;
pub use http::*;
pub use realtime::*;
pub use session::*;
