//! Realtime push adapters
//!
//! WebSocket transport plus the HEAD probe that decides whether a
//! deployment exposes the push endpoint at all.

pub mod probe;
pub mod transport;

pub use probe::HttpProbe;
pub use transport::WsTransport;
