//! Resource fetching and revalidation
//!
//! This module provides the fetch-with-revalidation controller and its
//! ports: producers supply fresh values, the shared cache stores them, and
//! [`ResourceFetcher`] manages the observable state in between.

pub mod fetcher;
pub mod options;
pub mod ports;
pub mod state;

pub use fetcher::ResourceFetcher;
pub use options::{ErrorHandler, FetchOptions};
pub use ports::{FocusSignal, ResourceProducer};
pub use state::ResourceState;
