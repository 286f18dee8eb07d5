//! Observable state of one fetch-backed resource.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Snapshot of a fetcher's externally visible state.
///
/// `data` holds the last successful value and survives later failures, so
/// a UI can keep rendering stale data next to an error banner. `error`
/// carries the resolved message of the most recent failure and is cleared
/// when the next visible fetch starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Last successfully produced value.
    pub data: Option<T>,
    /// A visible fetch is in flight.
    pub loading: bool,
    /// Resolved message of the last failure.
    pub error: Option<String>,
    /// Wall clock time of the last fetch completion, success or failure.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl<T> ResourceState<T> {
    /// Empty state. `loading` starts true when a mount-time fetch is
    /// expected so first paint can show a spinner.
    pub fn new(loading: bool) -> Self {
        Self { data: None, loading, error: None, last_fetched_at: None }
    }

    /// Whether the last completed fetch is older than `max_age`.
    ///
    /// A resource that never completed a fetch is not stale; staleness
    /// only measures the age of something we actually have. The
    /// comparison is strictly greater, so data exactly `max_age` old
    /// still counts as fresh.
    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match self.last_fetched_at {
            Some(at) => {
                now.signed_duration_since(at).num_milliseconds() > max_age.as_millis() as i64
            }
            None => false,
        }
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::new(false)
    }
}
