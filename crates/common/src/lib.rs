//! Modular common utilities shared across CareSync crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards to ensure
//! reliability across all CareSync components.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: time abstraction and retry pacing, std-only
//! - `runtime`: the resource cache (JSON payloads, wall clock stamps)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod resilience;
#[cfg(feature = "foundation")]
pub mod time;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{CacheStats, ResourceCache, StoredResource, TtlCache};
#[cfg(feature = "foundation")]
pub use resilience::BackoffStrategy;
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
