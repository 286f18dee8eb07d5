//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CareSync
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CareSyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Push channel error: {0}")]
    Push(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CareSyncError {
    /// The message carried by the error, without the variant prefix.
    ///
    /// Fetch-failure banners show the server-provided message when one was
    /// extracted at the API boundary, so display paths want the payload
    /// rather than the full `Display` rendering.
    pub fn display_message(&self) -> &str {
        match self {
            Self::Network(msg)
            | Self::Auth(msg)
            | Self::NotFound(msg)
            | Self::InvalidInput(msg)
            | Self::RateLimit(msg)
            | Self::Server(msg)
            | Self::Config(msg)
            | Self::Session(msg)
            | Self::Push(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for CareSync operations
pub type Result<T> = std::result::Result<T, CareSyncError>;
