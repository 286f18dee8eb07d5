//! Resilience patterns for fault tolerance
//!
//! This module provides **generic, reusable** retry pacing used by the
//! push client's reconnect loop. The implementations are:
//! - Pure functions over attempt numbers, so timing is testable without timers
//! - Framework-agnostic with no dependencies beyond `std`
//!
//! Scheduling (timers, cancellation) stays with the caller; this module
//! only answers "how long until the next attempt".

pub mod backoff;

pub use backoff::BackoffStrategy;
