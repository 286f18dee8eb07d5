//! Ports for the resource-fetching controller.

use std::future::Future;

use async_trait::async_trait;
use caresync_domain::Result;

/// Port producing a fresh value for one logical resource.
///
/// Implementations are typically thin wrappers over an API service call.
/// Failures come back as errors, never panics; the fetcher turns them into
/// observable state and user messaging.
///
/// Any `Fn() -> Future<Result<T>>` closure satisfies this port through the
/// blanket implementation below, so call sites can pass an async closure
/// directly:
///
/// ```no_run
/// use std::sync::Arc;
/// use caresync_core::ResourceProducer;
/// use caresync_domain::Result;
///
/// fn producer() -> Arc<dyn ResourceProducer<Vec<String>>> {
///     Arc::new(|| async { Ok(vec!["ana".to_string()]) })
/// }
/// ```
#[async_trait]
pub trait ResourceProducer<T>: Send + Sync {
    /// Produce a fresh value for the resource.
    async fn produce(&self) -> Result<T>;
}

#[async_trait]
impl<T, F, Fut> ResourceProducer<T> for F
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send,
{
    async fn produce(&self) -> Result<T> {
        self().await
    }
}

/// Port signalling that the application regained user focus.
///
/// The desktop shell adapts its window events to this; tests complete it
/// from a notify handle.
#[async_trait]
pub trait FocusSignal: Send + Sync {
    /// Completes when the application next gains focus.
    async fn focused(&self);
}
