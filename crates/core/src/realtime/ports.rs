//! Ports for the realtime push channel.
//!
//! The client owns the connection lifecycle; these traits abstract the
//! wire. `PushTransport` opens duplex connections, `CapabilityProbe`
//! answers whether the push endpoint exists at all, and both are adapted
//! to concrete protocols in the infrastructure layer.

use async_trait::async_trait;
use caresync_domain::Result;

/// Close code transports report when a connection drops without any close
/// handshake, mirroring the conventional abnormal-closure code.
pub const ABNORMAL_CLOSE: u16 = 1006;

/// Event surfaced by a live push connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived.
    Message(String),
    /// The connection closed. `clean` distinguishes an orderly close
    /// handshake from an abnormal loss; `code` carries the close code
    /// when the transport provides one, [`ABNORMAL_CLOSE`] otherwise.
    Closed { code: u16, clean: bool },
    /// The connection failed mid-stream. Terminal: no close event
    /// follows.
    Error(String),
}

/// Port opening duplex push connections.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open a connection to `url`, resolving once it is established.
    async fn connect(&self, url: &str) -> Result<Box<dyn PushConnection>>;
}

/// One live duplex connection.
#[async_trait]
pub trait PushConnection: Send {
    /// Next event from the server.
    ///
    /// Must be cancel-safe: dropping the returned future before it
    /// resolves must not lose an event. After a `Closed` or `Error`
    /// event the connection is spent and further calls keep returning
    /// `Closed`.
    async fn next_event(&mut self) -> TransportEvent;

    /// Send a text frame.
    async fn send(&mut self, text: &str) -> Result<()>;

    /// Close the connection cleanly. Idempotent.
    async fn close(&mut self);
}

/// Port answering whether the push endpoint exists.
///
/// Adapters keep this lightweight (a single HTTP HEAD in production);
/// a transport-level failure counts as unavailable.
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    /// Check the endpoint once. `true` means available.
    async fn check(&self) -> bool;
}
