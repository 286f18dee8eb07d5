//! Shared resource cache for API payloads
//!
//! This module layers a string-keyed, JSON-valued cache on top of
//! [`TtlCache`] so every fetched resource lands in one place. Values are
//! stored type-erased as [`serde_json::Value`] together with the wall
//! clock instant they were fetched, which lets consumers reason about
//! staleness independently of expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::core::TtlCache;
use super::stats::CacheStats;
use crate::time::{Clock, SystemClock};

/// A cached resource payload with its fetch timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResource {
    /// Type-erased resource payload
    pub data: Value,
    /// Wall clock time the payload was produced
    pub fetched_at: DateTime<Utc>,
}

/// Build a deterministic cache key from a resource identifier and its
/// request parameters
///
/// Object keys serialize in sorted order at every nesting level, so
/// logically equal parameter sets produce identical keys regardless of
/// how the object was assembled.
///
/// # Example
/// ```
/// use caresync_common::cache::generate_key;
/// use serde_json::json;
///
/// let key = generate_key("appointments", &json!({ "status": "confirmed" }));
/// assert_eq!(key, r#"appointments:{"status":"confirmed"}"#);
/// ```
pub fn generate_key(identifier: &str, params: &Value) -> String {
    format!("{identifier}:{params}")
}

/// String-keyed TTL cache shared by all resource fetchers
///
/// Cheap to clone; clones share the same storage. Entries expire per
/// the TTL supplied at insertion, defaulting to
/// [`ResourceCache::DEFAULT_TTL`] at call sites that have no better
/// number.
#[derive(Clone)]
pub struct ResourceCache<C = SystemClock>
where
    C: Clock + Clone,
{
    inner: TtlCache<String, StoredResource, C>,
    clock: C,
}

impl ResourceCache<SystemClock> {
    /// TTL applied when callers have no resource-specific duration
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

    /// Create an empty cache using the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ResourceCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ResourceCache<C>
where
    C: Clock + Clone,
{
    /// Create an empty cache with a custom clock (useful for testing)
    pub fn with_clock(clock: C) -> Self {
        Self { inner: TtlCache::with_clock(clock.clone()), clock }
    }

    /// Store a payload under the given key with its own TTL
    ///
    /// The fetch timestamp is stamped from the cache's clock at the
    /// moment of insertion.
    pub fn set(&self, key: &str, data: Value, ttl: Duration) {
        let fetched_at = DateTime::<Utc>::from(self.clock.system_time());
        self.inner.insert(key.to_string(), StoredResource { data, fetched_at }, ttl);
    }

    /// Look up a payload, dropping it if expired
    pub fn get(&self, key: &str) -> Option<StoredResource> {
        self.inner.get(&key.to_string())
    }

    /// Remove a single entry
    pub fn remove(&self, key: &str) -> Option<StoredResource> {
        self.inner.remove(&key.to_string())
    }

    /// Remove every entry whose key starts with the given prefix
    ///
    /// Returns the number of entries removed. Used to invalidate all
    /// cached variants of a resource after a mutation, for example
    /// every filtered appointment listing at once.
    pub fn remove_by_prefix(&self, prefix: &str) -> usize {
        self.inner.remove_matching(|key| key.starts_with(prefix))
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        self.inner.cleanup_expired()
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::resource.
    use std::time::UNIX_EPOCH;

    use serde_json::{json, Map};

    use super::*;
    use crate::time::MockClock;

    /// Validates `generate_key` behavior for the key format scenario.
    ///
    /// Assertions:
    /// - Confirms the key is the identifier, a colon, and the compact
    ///   JSON parameters.
    /// - Confirms empty parameters produce `identifier:{}`.
    #[test]
    fn test_generate_key_format() {
        let key = generate_key("appointments", &json!({ "status": "confirmed" }));
        assert_eq!(key, r#"appointments:{"status":"confirmed"}"#);

        let empty = generate_key("appointments", &json!({}));
        assert_eq!(empty, "appointments:{}");
    }

    /// Validates `generate_key` behavior for the insertion order scenario.
    ///
    /// Assertions:
    /// - Confirms two parameter objects built in opposite key order
    ///   produce identical keys.
    #[test]
    fn test_generate_key_ignores_insertion_order() {
        let mut forward = Map::new();
        forward.insert("patient".to_string(), json!(7));
        forward.insert("status".to_string(), json!("confirmed"));

        let mut reverse = Map::new();
        reverse.insert("status".to_string(), json!("confirmed"));
        reverse.insert("patient".to_string(), json!(7));

        assert_eq!(
            generate_key("appointments", &Value::Object(forward)),
            generate_key("appointments", &Value::Object(reverse)),
        );
    }

    /// Validates `generate_key` behavior for the nested parameters scenario.
    ///
    /// Assertions:
    /// - Confirms nested object keys also serialize sorted.
    #[test]
    fn test_generate_key_sorts_nested_objects() {
        let mut inner = Map::new();
        inner.insert("to".to_string(), json!("2025-06-30"));
        inner.insert("from".to_string(), json!("2025-06-01"));

        let mut params = Map::new();
        params.insert("range".to_string(), Value::Object(inner));

        let key = generate_key("appointments", &Value::Object(params));
        assert_eq!(key, r#"appointments:{"range":{"from":"2025-06-01","to":"2025-06-30"}}"#);
    }

    /// Validates `MockClock::new` behavior for the set and get scenario.
    ///
    /// Assertions:
    /// - Confirms the stored payload round-trips.
    /// - Confirms `fetched_at` reflects the clock at insertion time.
    #[test]
    fn test_set_and_get_stamps_fetched_at() {
        let clock = MockClock::new();
        clock.set_elapsed(Duration::from_secs(1_000));
        let cache = ResourceCache::with_clock(clock.clone());

        cache.set("appointments:{}", json!([{ "id": 1 }]), Duration::from_secs(60));

        let stored = cache.get("appointments:{}").unwrap();
        assert_eq!(stored.data, json!([{ "id": 1 }]));

        let expected = DateTime::<Utc>::from(UNIX_EPOCH + Duration::from_secs(1_000));
        assert_eq!(stored.fetched_at, expected);
    }

    /// Validates `MockClock::new` behavior for the default TTL expiry
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms a hit just inside the five minute window.
    /// - Confirms a miss one second past it.
    #[test]
    fn test_entry_expires_after_default_ttl() {
        let clock = MockClock::new();
        let cache = ResourceCache::with_clock(clock.clone());

        cache.set("patients:{}", json!([]), ResourceCache::DEFAULT_TTL);

        clock.advance(Duration::from_secs(5 * 60 - 1));
        assert!(cache.get("patients:{}").is_some());

        clock.advance(Duration::from_secs(2));
        assert!(cache.get("patients:{}").is_none());
    }

    /// Validates `MockClock::new` behavior for the short per-entry TTL
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms an immediate hit on a one second entry.
    /// - Confirms a miss 1100ms later.
    #[test]
    fn test_short_ttl_entry_expires() {
        let clock = MockClock::new();
        let cache = ResourceCache::with_clock(clock.clone());

        cache.set("patients:{}", json!([{ "id": 1 }, { "id": 2 }]), Duration::from_millis(1_000));
        assert!(cache.get("patients:{}").is_some());

        clock.advance(Duration::from_millis(1_100));
        assert!(cache.get("patients:{}").is_none());
    }

    /// Validates `ResourceCache::new` behavior for the prefix invalidation
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `removed` equals `2`.
    /// - Confirms only entries under the prefix were dropped.
    #[test]
    fn test_remove_by_prefix() {
        let cache = ResourceCache::new();

        cache.set(
            r#"appointments:{"status":"confirmed"}"#,
            json!([]),
            ResourceCache::DEFAULT_TTL,
        );
        cache.set("appointments:{}", json!([]), ResourceCache::DEFAULT_TTL);
        cache.set("patients:{}", json!([]), ResourceCache::DEFAULT_TTL);

        let removed = cache.remove_by_prefix("appointments:");
        assert_eq!(removed, 2);
        assert!(cache.get("appointments:{}").is_none());
        assert!(cache.get("patients:{}").is_some());
    }

    /// Validates `MockClock::new` behavior for the cleanup expired scenario.
    ///
    /// Assertions:
    /// - Confirms `removed` equals `1`.
    /// - Confirms the longer-lived entry survives.
    #[test]
    fn test_cleanup_expired_counts_removals() {
        let clock = MockClock::new();
        let cache = ResourceCache::with_clock(clock.clone());

        cache.set("short:{}", json!(1), Duration::from_secs(10));
        cache.set("long:{}", json!(2), Duration::from_secs(120));

        clock.advance(Duration::from_secs(30));

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("long:{}").is_some());
    }

    /// Validates `ResourceCache::new` behavior for the clear scenario.
    ///
    /// Assertions:
    /// - Confirms `cache.is_empty()` evaluates to true after clearing.
    #[test]
    fn test_clear_empties_cache() {
        let cache = ResourceCache::new();

        cache.set("a:{}", json!(1), ResourceCache::DEFAULT_TTL);
        cache.set("b:{}", json!(2), ResourceCache::DEFAULT_TTL);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    /// Validates `ResourceCache::new` behavior for the clone shares storage
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms an insert through one handle is visible through the
    ///   other.
    #[test]
    fn test_clone_shares_storage() {
        let cache = ResourceCache::new();
        let other = cache.clone();

        cache.set("a:{}", json!(1), ResourceCache::DEFAULT_TTL);
        assert!(other.get("a:{}").is_some());
    }
}
