//! Generic cache implementations with per-entry TTL expiration
//!
//! This module provides the caching layer shared by every API resource:
//! a generic TTL cache plus a string-keyed, JSON-valued facade with
//! deterministic key generation.
//!
//! # Features
//!
//! - **Thread-safe**: Uses `Arc<RwLock<>>` for safe concurrent access
//! - **Generic**: Works with any `K: Eq + Hash + Clone` and `V: Clone`
//! - **Per-entry TTL**: Every insertion carries its own time-to-live
//! - **Metrics tracking**: Hit/miss/insert/expiration statistics
//! - **Testable**: Clock abstraction for deterministic time-based testing
//!
//! # Examples
//!
//! ## Generic TTL Cache
//! ```
//! use std::time::Duration;
//!
//! use caresync_common::cache::TtlCache;
//!
//! let cache: TtlCache<String, i32> = TtlCache::new();
//! cache.insert("key".to_string(), 42, Duration::from_secs(60));
//! assert_eq!(cache.get(&"key".to_string()), Some(42));
//! ```
//!
//! ## Resource Cache with Deterministic Keys
//! ```
//! use caresync_common::cache::{generate_key, ResourceCache};
//! use serde_json::json;
//!
//! let cache = ResourceCache::new();
//! let key = generate_key("appointments", &json!({ "status": "confirmed" }));
//!
//! cache.set(&key, json!([{ "id": 1 }]), ResourceCache::DEFAULT_TTL);
//! assert!(cache.get(&key).is_some());
//! ```
//!
//! ## Prefix Invalidation After a Mutation
//! ```
//! use caresync_common::cache::ResourceCache;
//! use serde_json::json;
//!
//! let cache = ResourceCache::new();
//! cache.set("appointments:{}", json!([]), ResourceCache::DEFAULT_TTL);
//!
//! // Creating an appointment invalidates every cached listing
//! cache.remove_by_prefix("appointments:");
//! assert!(cache.is_empty());
//! ```
//!
//! ## Cache Statistics
//! ```
//! use std::time::Duration;
//!
//! use caresync_common::cache::TtlCache;
//!
//! let cache: TtlCache<String, i32> = TtlCache::new();
//!
//! cache.insert("key1".to_string(), 1, Duration::from_secs(60));
//! let _ = cache.get(&"key1".to_string());
//!
//! let stats = cache.stats();
//! println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
//! println!("Cache size: {}", stats.size);
//! ```
//!
//! # Thread Safety
//!
//! The cache is thread-safe and can be shared across threads using `Arc`:
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//!
//! use caresync_common::cache::TtlCache;
//!
//! let cache = Arc::new(TtlCache::new());
//!
//! let mut handles = vec![];
//! for i in 0..10 {
//!     let cache_clone = Arc::clone(&cache);
//!     let handle = thread::spawn(move || {
//!         cache_clone.insert(format!("key-{}", i), i, Duration::from_secs(60));
//!     });
//!     handles.push(handle);
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```

mod core;
mod resource;
mod stats;

// Re-export public API
pub use core::TtlCache;
pub use resource::{generate_key, ResourceCache, StoredResource};
pub use stats::CacheStats;
