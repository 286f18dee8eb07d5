//! Realtime push channel: reconnecting client, listener registry and
//! the notification feed built on top of them.

pub mod client;
pub mod feed;
pub mod ports;
pub mod registry;

pub use client::{reconnect_delay, ConnectionState, EventStreamClient};
pub use feed::NotificationFeed;
pub use ports::{CapabilityProbe, PushConnection, PushTransport, TransportEvent, ABNORMAL_CLOSE};
pub use registry::{ListenerRegistry, SubscriptionId};
