//! # CareSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The resource fetching controller and its cache/state handling
//! - The realtime push client, listener registry and notification feed
//! - Port/adapter interfaces (traits) for everything infrastructural
//!
//! ## Architecture Principles
//! - Only depends on `caresync-common` and `caresync-domain`
//! - No HTTP, WebSocket, or storage code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod realtime;
pub mod resource;

// Infrastructure ports
pub mod notify_ports;
pub mod session_ports;

// Re-export specific items to avoid ambiguity
pub use notify_ports::Notifier;
pub use realtime::{
    CapabilityProbe, ConnectionState, EventStreamClient, ListenerRegistry, NotificationFeed,
    PushConnection, PushTransport, SubscriptionId, TransportEvent, ABNORMAL_CLOSE,
};
pub use resource::{
    ErrorHandler, FetchOptions, FocusSignal, ResourceFetcher, ResourceProducer, ResourceState,
};
pub use session_ports::{AccessTokenProvider, SessionStore};
