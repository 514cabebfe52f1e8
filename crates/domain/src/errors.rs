//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Atelier
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AtelierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The session service refused the request because of its own state,
    /// e.g. another session is already active.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The local timer is not in a status that allows the requested action.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The remote service failed (5xx).
    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtelierError {
    /// Whether the error came back from (or on the way to) the session
    /// service, as opposed to a local guard.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Auth(_)
                | Self::NotFound(_)
                | Self::Conflict(_)
                | Self::Remote(_)
        )
    }
}

/// Result type alias for Atelier operations
pub type Result<T> = std::result::Result<T, AtelierError>;
