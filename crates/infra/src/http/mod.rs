//! HTTP client with retry and backoff.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
