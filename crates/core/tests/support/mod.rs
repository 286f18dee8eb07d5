//! Shared test helpers for `caresync-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! push-channel tests can focus on behaviour instead of boilerplate.

pub mod push;
