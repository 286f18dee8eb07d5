//! Time utilities and abstractions
//!
//! This module provides the clock abstraction used by every time-dependent
//! component (cache expiry, staleness checks, reconnect pacing):
//! - **[`clock`]**: Real and mock time sources
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use caresync_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! clock.advance(Duration::from_secs(60));
//! assert_eq!(clock.millis_since_epoch(), 60_000);
//! ```

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
