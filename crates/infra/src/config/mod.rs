//! Configuration loading
//!
//! File probing, environment overrides and validation for
//! [`caresync_domain::ClientConfig`].

pub mod loader;

pub use loader::{derive_push_url, load, load_from_file, resolve_push_url, validate};
