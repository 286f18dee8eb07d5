//! Session persistence and auth token ports.
//!
//! The client keeps a small amount of session-scoped state outside process
//! memory: the confirmed push-availability flag and the tokens issued at
//! login. `SessionStore` is the persistence seam (process memory in tests, a
//! JSON file on desktop); `AccessTokenProvider` narrows it to the single
//! question the API and realtime clients ask.
//!
//! # Example
//!
//! ```no_run
//! use caresync_core::SessionStore;
//! use caresync_domain::constants::PUSH_AVAILABILITY_KEY;
//!
//! fn push_disabled(session: &dyn SessionStore) -> bool {
//!     session.get(PUSH_AVAILABILITY_KEY).as_deref() == Some("false")
//! }
//! ```

/// Port for session-scoped key/value persistence.
///
/// Values are tiny strings and every backing store answers from memory, so
/// the API is synchronous. Adapters swallow their own I/O failures: a read
/// that fails behaves as an absent key, a write that fails is logged and
/// dropped.
pub trait SessionStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, overwriting any previous value.
    fn put(&self, key: &str, value: &str);

    /// Remove `key`. No-op when the key is absent.
    fn remove(&self, key: &str);
}

/// Port exposing the signed-in user's access token.
///
/// Implemented by the auth service; consumed by the API client for bearer
/// headers and by the realtime client when a reconnect needs a fresh token.
pub trait AccessTokenProvider: Send + Sync {
    /// The current access token, or `None` when no session is active.
    fn access_token(&self) -> Option<String>;
}
