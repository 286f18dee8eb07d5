//! Client configuration
//!
//! Runtime-tunable settings for the API client, the shared resource cache
//! and the push-channel reconnect policy. Every section falls back to
//! defaults wired from [`crate::constants`], so a missing or partial config
//! file still yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CACHE_SWEEP_INTERVAL_SECS, DEFAULT_API_BASE_URL, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_RECONNECT_ATTEMPTS, RECONNECT_BASE_DELAY_MS,
    RECONNECT_MAX_DELAY_MS,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub reconnect: ReconnectConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Push endpoint URL; derived from `base_url` when unset
    pub push_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Resource cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default entry lifetime in seconds
    pub ttl_seconds: u64,
    /// Interval between expired-entry sweeps in seconds
    pub sweep_interval_seconds: u64,
}

/// Push-channel reconnect policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Attempt cap before the channel gives up
    pub max_attempts: u32,
    /// Delay before the first reconnect attempt, in milliseconds
    pub base_delay_ms: u64,
    /// Ceiling on the exponential backoff, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            push_url: None,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
            sweep_interval_seconds: CACHE_SWEEP_INTERVAL_SECS,
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RECONNECT_ATTEMPTS,
            base_delay_ms: RECONNECT_BASE_DELAY_MS,
            max_delay_ms: RECONNECT_MAX_DELAY_MS,
        }
    }
}
