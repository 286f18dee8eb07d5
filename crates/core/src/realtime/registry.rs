//! Listener registry for push events.
//!
//! Callbacks register per [`EventKind`] and are invoked in registration
//! order when an event of that kind is dispatched. A panicking callback
//! is contained so the remaining listeners still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use caresync_domain::EventKind;
use serde_json::Value;
use tracing::error;

/// Handle returned by [`ListenerRegistry::subscribe`], used to remove
/// exactly that registration later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Per-kind listener table.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<HashMap<EventKind, Vec<(SubscriptionId, Callback)>>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind` and return its removal handle.
    ///
    /// The same closure may be registered more than once; each call
    /// yields a distinct handle and a distinct invocation per dispatch.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self.listeners.lock().unwrap();
        listeners.entry(kind).or_default().push((id, Arc::new(callback)));
        id
    }

    /// Remove the registration identified by `id`. Unknown handles are
    /// ignored.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) {
        let mut listeners = self.listeners.lock().unwrap();
        if let Some(entries) = listeners.get_mut(&kind) {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let listeners = self.listeners.lock().unwrap();
        listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Invoke every listener registered for `kind` with `payload`, in
    /// registration order, and return how many ran.
    ///
    /// A panic inside one callback is caught and logged; later callbacks
    /// still run.
    pub fn dispatch(&self, kind: EventKind, payload: &Value) -> usize {
        let callbacks: Vec<Callback> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .get(&kind)
                .map(|entries| entries.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };

        for callback in &callbacks {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(payload))) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(kind = kind.as_str(), reason, "push listener panicked");
            }
        }
        callbacks.len()
    }
}
