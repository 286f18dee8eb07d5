//! User-notification port.
//!
//! Fetch failures and connection lifecycle changes surface to the user as
//! transient toasts. Core raises them through this port; the shell decides
//! how (and whether) to present them.
//!
//! # Example
//!
//! ```no_run
//! use caresync_core::Notifier;
//! use caresync_domain::ToastNotification;
//!
//! fn warn_offline(notifier: &dyn Notifier) {
//!     notifier.notify(ToastNotification::warning("Sin conexión"));
//! }
//! ```

use caresync_domain::ToastNotification;

/// Port for surfacing transient user-facing notifications.
///
/// `notify` is fire-and-forget and must not block: it is called from async
/// context and from event-dispatch callbacks. Delivery failures stay inside
/// the adapter.
pub trait Notifier: Send + Sync {
    /// Present `toast` to the user.
    fn notify(&self, toast: ToastNotification);
}
