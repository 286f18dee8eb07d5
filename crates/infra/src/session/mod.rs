//! Session persistence adapters

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore};
