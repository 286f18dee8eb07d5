//! Background cache sweeper
//!
//! Periodically drops expired entries from the shared resource cache so
//! that memory is reclaimed even when no reads touch the stale keys.

use std::sync::Arc;
use std::time::Duration;

use caresync_common::cache::ResourceCache;
use caresync_common::time::{Clock, SystemClock};
use caresync_domain::{CareSyncError, ClientConfig, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type TaskHandle = Arc<tokio::sync::Mutex<Option<JoinHandle<()>>>>;

/// Sweeper timing configuration
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(caresync_domain::constants::CACHE_SWEEP_INTERVAL_SECS) }
    }
}

impl From<&ClientConfig> for SweeperConfig {
    fn from(config: &ClientConfig) -> Self {
        Self { interval: Duration::from_secs(config.cache.sweep_interval_seconds) }
    }
}

/// Periodic sweep task over a [`ResourceCache`]
pub struct CacheSweeper<C = SystemClock>
where
    C: Clock + Clone,
{
    cache: ResourceCache<C>,
    config: SweeperConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl<C> CacheSweeper<C>
where
    C: Clock + Clone,
{
    pub fn new(cache: ResourceCache<C>, config: SweeperConfig) -> Self {
        Self {
            cache,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    /// Start the background sweep loop.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(CareSyncError::Internal("cache sweeper already running".to_string()));
        }

        // Fresh token so a stopped sweeper can be started again.
        self.cancellation_token = CancellationToken::new();

        let cache = self.cache.clone();
        let interval = self.config.interval;
        let token = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            sweep_loop(cache, interval, token).await;
        });

        *self.task_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Stop the sweep loop and wait for the task to finish.
    pub async fn stop(&self) -> Result<()> {
        if !self.is_running() {
            return Err(CareSyncError::Internal("cache sweeper is not running".to_string()));
        }

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .map_err(|_| {
                    CareSyncError::Internal("cache sweeper did not stop within 5s".to_string())
                })?
                .map_err(|err| {
                    CareSyncError::Internal(format!("cache sweeper task panicked: {err}"))
                })?;
        }

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }
}

impl<C> Drop for CacheSweeper<C>
where
    C: Clock + Clone,
{
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            warn!("cache sweeper dropped while running; cancelling sweep task");
            self.cancellation_token.cancel();
        }
    }
}

async fn sweep_loop<C>(cache: ResourceCache<C>, interval: Duration, token: CancellationToken)
where
    C: Clock + Clone,
{
    info!(interval_secs = interval.as_secs(), "cache sweeper started");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("cache sweeper stopped");
                break;
            }
            _ = tokio::time::sleep(interval) => {
                let removed = cache.cleanup_expired();
                if removed > 0 {
                    debug!(removed, "swept expired cache entries");
                }
            }
        }
    }
}
