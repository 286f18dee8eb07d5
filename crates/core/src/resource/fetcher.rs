//! Fetch-with-revalidation controller for one logical resource.
//!
//! A [`ResourceFetcher`] wraps an asynchronous producer and manages the
//! observable [`ResourceState`] around it: loading flags, resolved error
//! messages, cache seeding and write-back, manual and silent refresh,
//! focus-driven revalidation and dependency-triggered remounts. One fetcher
//! exists per logical resource; all fetchers share the process-wide
//! [`ResourceCache`].

use std::sync::{Arc, Mutex};

use caresync_common::cache::ResourceCache;
use caresync_common::time::{Clock, SystemClock};
use caresync_domain::constants::FETCH_ERROR_FALLBACK;
use caresync_domain::{Result, ToastNotification};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::notify_ports::Notifier;
use crate::resource::options::FetchOptions;
use crate::resource::ports::{FocusSignal, ResourceProducer};
use crate::resource::state::ResourceState;

/// Cache identity of a fetcher: the key it reads and writes plus the
/// dependency values whose change replays the mount cycle.
#[derive(Debug, Clone, PartialEq)]
struct Binding {
    cache_key: String,
    dependencies: Vec<Value>,
}

/// Data-fetching controller around one producer and one cache key.
///
/// Construction is cheap and synchronous; [`mount`](Self::mount) performs
/// the initial cache seed and fetch. Concurrent fetches on the same
/// instance are not ordered against each other: the last completion wins,
/// matching the shared-cache policy.
///
/// ```no_run
/// use std::sync::Arc;
/// use caresync_common::cache::ResourceCache;
/// use caresync_core::{FetchOptions, ResourceFetcher};
///
/// # async fn example(cache: ResourceCache) -> caresync_domain::Result<()> {
/// let fetcher = ResourceFetcher::new(
///     Arc::new(|| async { Ok(vec!["Ana Ruiz".to_string()]) }),
///     "patients:{}",
///     cache,
///     FetchOptions::default(),
/// );
/// fetcher.mount().await?;
/// let patients = fetcher.state().data.unwrap_or_default();
/// # Ok(())
/// # }
/// ```
pub struct ResourceFetcher<T, C = SystemClock>
where
    C: Clock + Clone,
{
    producer: Arc<dyn ResourceProducer<T>>,
    cache: ResourceCache<C>,
    options: FetchOptions,
    binding: Mutex<Binding>,
    state: Mutex<ResourceState<T>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: C,
}

impl<T> ResourceFetcher<T, SystemClock>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    /// Create a fetcher using the system clock.
    pub fn new(
        producer: Arc<dyn ResourceProducer<T>>,
        cache_key: impl Into<String>,
        cache: ResourceCache,
        options: FetchOptions,
    ) -> Self {
        Self::with_clock(producer, cache_key, cache, options, SystemClock)
    }
}

impl<T, C> ResourceFetcher<T, C>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
    C: Clock + Clone,
{
    /// Create a fetcher with a custom clock (useful for testing).
    pub fn with_clock(
        producer: Arc<dyn ResourceProducer<T>>,
        cache_key: impl Into<String>,
        cache: ResourceCache<C>,
        options: FetchOptions,
        clock: C,
    ) -> Self {
        let binding = Binding {
            cache_key: cache_key.into(),
            dependencies: options.dependencies.clone(),
        };
        // Loading starts raised when a mount-time fetch is coming, so the
        // first state read already shows the spinner.
        let state = ResourceState::new(options.load_on_mount);
        Self {
            producer,
            cache,
            options,
            binding: Mutex::new(binding),
            state: Mutex::new(state),
            notifier: None,
            clock,
        }
    }

    /// Attach a notifier for fetch-failure toasts.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Snapshot of the current observable state.
    pub fn state(&self) -> ResourceState<T> {
        self.state.lock().unwrap().clone()
    }

    /// The cache key currently bound to this fetcher.
    pub fn cache_key(&self) -> String {
        self.binding.lock().unwrap().cache_key.clone()
    }

    /// The options this fetcher was built with.
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Run the mount cycle: seed from cache, then fetch as configured.
    ///
    /// A valid cache entry seeds `data` and `last_fetched_at` before any
    /// network activity and is followed by a background refresh unless
    /// `revalidate_on_mount` is off. Without a usable entry, a visible
    /// fetch runs when `load_on_mount` is on.
    pub async fn mount(&self) -> Result<()> {
        if self.options.should_cache {
            let key = self.cache_key();
            if let Some(stored) = self.cache.get(&key) {
                match serde_json::from_value::<T>(stored.data) {
                    Ok(data) => {
                        {
                            let mut state = self.state.lock().unwrap();
                            state.data = Some(data);
                            state.loading = false;
                            state.error = None;
                            state.last_fetched_at = Some(stored.fetched_at);
                        }
                        debug!(cache_key = %key, "seeded resource from cache");
                        if self.options.revalidate_on_mount {
                            self.fetch(true).await?;
                        }
                        return Ok(());
                    }
                    Err(err) => {
                        warn!(
                            cache_key = %key,
                            error = %err,
                            "cached payload no longer matches resource type; refetching"
                        );
                        self.cache.remove(&key);
                    }
                }
            }
        }

        if self.options.load_on_mount {
            self.fetch(false).await?;
        }
        Ok(())
    }

    /// Visible refetch: raises `loading` for the duration of the flight.
    pub async fn refresh(&self) -> Result<T> {
        self.fetch(false).await
    }

    /// Background refetch: never touches `loading`.
    pub async fn silent_refresh(&self) -> Result<T> {
        self.fetch(true).await
    }

    /// Optimistic local mutation of `data`, no network involved.
    ///
    /// The updater sees the current value and returns the next one, which
    /// is stamped as freshly fetched and written to the cache under the
    /// current key. Concurrent fetch completions may overwrite it.
    pub fn update_local_data<F>(&self, updater: F)
    where
        F: FnOnce(Option<&T>) -> T,
    {
        let current = self.state.lock().unwrap().data.clone();
        let next = updater(current.as_ref());
        let now = DateTime::<Utc>::from(self.clock.system_time());
        {
            let mut state = self.state.lock().unwrap();
            state.data = Some(next.clone());
            state.last_fetched_at = Some(now);
        }
        if self.options.should_cache {
            let key = self.cache_key();
            match serde_json::to_value(&next) {
                Ok(value) => self.cache.set(&key, value, self.options.cache_duration),
                Err(err) => warn!(
                    cache_key = %key,
                    error = %err,
                    "local update not serializable; skipping cache write"
                ),
            }
        }
    }

    /// Drop this fetcher's cache entry. In-memory `data` is untouched.
    pub fn clear_cache(&self) {
        self.cache.remove(&self.cache_key());
    }

    /// Point the fetcher at a new identity and replay the mount cycle.
    ///
    /// No-op when both the key and the dependency values are unchanged.
    /// An in-flight fetch for the old identity is not cancelled; its
    /// completion may land after the remount (last completion wins).
    pub async fn rebind(&self, cache_key: impl Into<String>, dependencies: Vec<Value>) -> Result<()> {
        let next = Binding { cache_key: cache_key.into(), dependencies };
        {
            let mut binding = self.binding.lock().unwrap();
            if *binding == next {
                return Ok(());
            }
            *binding = next;
        }
        debug!(cache_key = %self.cache_key(), "fetcher identity changed; replaying mount");
        self.mount().await
    }

    /// Revalidate on application focus for the life of the returned task.
    ///
    /// Each focus signal triggers a visible refetch when the data is older
    /// than `cache_duration`. Abort the handle to stop watching; dropping
    /// it detaches the task instead. Returns an already-finished task when
    /// `revalidate_on_focus` is off.
    pub fn watch_focus(self: &Arc<Self>, signal: Arc<dyn FocusSignal>) -> JoinHandle<()> {
        if !self.options.revalidate_on_focus {
            return tokio::spawn(async {});
        }
        let fetcher = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                signal.focused().await;
                fetcher.handle_focus().await;
            }
        })
    }

    async fn handle_focus(&self) {
        let now = DateTime::<Utc>::from(self.clock.system_time());
        let stale = self.state.lock().unwrap().is_stale(self.options.cache_duration, now);
        if stale {
            // Failure state and messaging are handled inside fetch.
            let _ = self.fetch(false).await;
        }
    }

    /// Shared fetch path. `silent` suppresses the loading flag and the
    /// pre-flight error reset; everything else is identical.
    async fn fetch(&self, silent: bool) -> Result<T> {
        if !silent {
            let mut state = self.state.lock().unwrap();
            state.loading = true;
            state.error = None;
        }

        let outcome = self.producer.produce().await;
        let now = DateTime::<Utc>::from(self.clock.system_time());

        match outcome {
            Ok(data) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.data = Some(data.clone());
                    state.loading = false;
                    state.error = None;
                    state.last_fetched_at = Some(now);
                }
                if self.options.should_cache {
                    let key = self.cache_key();
                    match serde_json::to_value(&data) {
                        Ok(value) => {
                            self.cache.set(&key, value, self.options.cache_duration);
                        }
                        Err(err) => warn!(
                            cache_key = %key,
                            error = %err,
                            "resource not serializable; skipping cache write"
                        ),
                    }
                }
                Ok(data)
            }
            Err(err) => {
                let message = self.resolve_error_message(&err);
                {
                    let mut state = self.state.lock().unwrap();
                    state.loading = false;
                    state.error = Some(message.clone());
                    // Stamped on failure too, so staleness keeps advancing.
                    state.last_fetched_at = Some(now);
                }
                error!(cache_key = %self.cache_key(), error = %err, "resource fetch failed");
                if let Some(notifier) = &self.notifier {
                    notifier.notify(ToastNotification::error(message));
                }
                Err(err)
            }
        }
    }

    /// Resolve the user-facing message for a failed fetch: a custom
    /// handler wins outright, then the error's own display message, then
    /// the generic fallback when that message is empty.
    fn resolve_error_message(&self, err: &caresync_domain::CareSyncError) -> String {
        if let Some(handler) = &self.options.error_handler {
            return handler(err);
        }
        let message = err.display_message();
        if message.is_empty() {
            FETCH_ERROR_FALLBACK.to_string()
        } else {
            message.to_string()
        }
    }
}
