//! Core cache implementation with per-entry TTL expiration
//!
//! This module provides a generic, thread-safe cache where every entry
//! carries its own time-to-live. There is no capacity limit and no
//! eviction policy; entries leave the cache only through expiry or
//! explicit removal.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Entry stored in the cache with its expiry metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

/// Generic thread-safe cache with per-entry TTL expiration
///
/// An entry is considered valid through its exact deadline: it expires
/// only once more than `ttl` has elapsed since insertion. Expired
/// entries are dropped lazily on access and eagerly by
/// [`cleanup_expired`](TtlCache::cleanup_expired).
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone`)
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for time-based operations (defaults to `SystemClock`)
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use caresync_common::cache::TtlCache;
///
/// let cache: TtlCache<String, i32> = TtlCache::new();
/// cache.insert("key".to_string(), 42, Duration::from_secs(60));
/// assert_eq!(cache.get(&"key".to_string()), Some(42));
/// ```
pub struct TtlCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new empty cache using the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K, V> Default for TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(clock: C) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), metrics: MetricsCollector::new(), clock }
    }

    /// Insert a value with its own time-to-live
    ///
    /// Inserting over an existing key replaces the value and restarts
    /// the expiry window.
    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        let mut entries = self.entries.write().unwrap();

        let entry = CacheEntry { value, inserted_at: self.clock.now(), ttl };
        entries.insert(key, entry);

        self.metrics.record_insert();
    }

    /// Get a value from the cache
    ///
    /// Returns `None` if the key doesn't exist or if the entry has expired.
    /// An expired entry is removed as a side effect of the lookup.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().unwrap();

        let expired = match entries.get(key) {
            Some(entry) => self.is_expired(entry),
            None => {
                self.metrics.record_miss();
                return None;
            }
        };

        if expired {
            entries.remove(key);
            self.metrics.record_miss();
            self.metrics.record_expiration();
            return None;
        }

        self.metrics.record_hit();
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Get or insert with a generator function
    ///
    /// If the key exists and hasn't expired, returns the cached value.
    /// Otherwise, generates a new value using the provided function and
    /// stores it under the given TTL.
    pub fn get_or_insert_with<F>(&self, key: K, ttl: Duration, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = f();
        self.insert(key, value.clone(), ttl);
        value
    }

    /// Remove a value from the cache
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key).map(|e| e.value)
    }

    /// Remove every entry whose key matches the predicate
    ///
    /// Returns the number of entries removed. Expiry is not consulted;
    /// matching entries go regardless of freshness.
    pub fn remove_matching<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let mut entries = self.entries.write().unwrap();

        let keys_to_remove: Vec<K> = entries.keys().filter(|k| predicate(k)).cloned().collect();

        for key in &keys_to_remove {
            entries.remove(key);
        }

        keys_to_remove.len()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
        self.metrics.reset();
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap();

        // Collect keys to remove (avoid borrow conflict)
        let keys_to_remove: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.inserted_at) > entry.ttl)
            .map(|(k, _)| k.clone())
            .collect();

        for key in &keys_to_remove {
            entries.remove(key);
            self.metrics.record_expiration();
        }

        keys_to_remove.len()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        self.metrics.snapshot(size)
    }

    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        self.clock.now().duration_since(entry.inserted_at) > entry.ttl
    }
}

impl<K, V, C> Clone for TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
