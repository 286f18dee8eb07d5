//! Cache maintenance

pub mod sweeper;

pub use sweeper::{CacheSweeper, SweeperConfig};
