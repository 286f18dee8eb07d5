//! Behaviour knobs for [`ResourceFetcher`](crate::resource::ResourceFetcher).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use caresync_common::cache::ResourceCache;
use caresync_domain::CareSyncError;
use serde_json::Value;

/// Custom error-message resolver.
///
/// When supplied it wins over the built-in resolution chain and its output
/// is used verbatim.
pub type ErrorHandler = Arc<dyn Fn(&CareSyncError) -> String + Send + Sync>;

/// Options controlling one fetcher's caching and revalidation behaviour.
///
/// `FetchOptions::default()` matches the product defaults: five-minute cache
/// entries, fetch on mount, background revalidation of cached values, no
/// focus revalidation.
#[derive(Clone)]
pub struct FetchOptions {
    /// TTL written to the cache on successful fetches.
    pub cache_duration: Duration,
    /// Refetch when the application regains focus and the data is older
    /// than `cache_duration`.
    pub revalidate_on_focus: bool,
    /// A cached value at mount still triggers a background refresh.
    pub revalidate_on_mount: bool,
    /// Fetch at mount when no valid cache entry exists.
    pub load_on_mount: bool,
    /// When false the fetcher is a plain fetch-state wrapper: no cache
    /// reads or writes.
    pub should_cache: bool,
    /// Ordered values forming the fetcher's identity together with the
    /// cache key; any change replays the mount cycle.
    pub dependencies: Vec<Value>,
    /// Overrides the default error-message resolution.
    pub error_handler: Option<ErrorHandler>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache_duration: ResourceCache::DEFAULT_TTL,
            revalidate_on_focus: false,
            revalidate_on_mount: true,
            load_on_mount: true,
            should_cache: true,
            dependencies: Vec::new(),
            error_handler: None,
        }
    }
}

impl FetchOptions {
    /// Create options with the product defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL written to the cache on successful fetches.
    pub fn with_cache_duration(mut self, ttl: Duration) -> Self {
        self.cache_duration = ttl;
        self
    }

    /// Enable or disable focus-driven revalidation.
    pub fn with_revalidate_on_focus(mut self, enabled: bool) -> Self {
        self.revalidate_on_focus = enabled;
        self
    }

    /// Enable or disable the background refresh after a cache seed.
    pub fn with_revalidate_on_mount(mut self, enabled: bool) -> Self {
        self.revalidate_on_mount = enabled;
        self
    }

    /// Enable or disable the mount-time fetch.
    pub fn with_load_on_mount(mut self, enabled: bool) -> Self {
        self.load_on_mount = enabled;
        self
    }

    /// Enable or disable cache integration entirely.
    pub fn with_should_cache(mut self, enabled: bool) -> Self {
        self.should_cache = enabled;
        self
    }

    /// Set the dependency list that triggers remounts when it changes.
    pub fn with_dependencies(mut self, dependencies: Vec<Value>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Install a custom error-message resolver.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CareSyncError) -> String + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("cache_duration", &self.cache_duration)
            .field("revalidate_on_focus", &self.revalidate_on_focus)
            .field("revalidate_on_mount", &self.revalidate_on_mount)
            .field("load_on_mount", &self.load_on_mount)
            .field("should_cache", &self.should_cache)
            .field("dependencies", &self.dependencies)
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}
