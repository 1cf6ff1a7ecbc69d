//! Error types shared by both functions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TroutslapError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Slack rejected a request (install exchange or message post).
    #[error("Slack API error: {0}")]
    Upstream(String),

    /// No access token stored for the workspace.
    #[error("No token found for team_id={0}")]
    MissingCredential(String),

    /// Installation store failure.
    #[error("Installation store error: {0}")]
    Store(String),

    /// Job queue failure.
    #[error("Queue error: {0}")]
    Queue(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<reqwest::Error> for TroutslapError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TroutslapError::Json(err.to_string())
        } else {
            TroutslapError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TroutslapError {
    fn from(err: serde_json::Error) -> Self {
        TroutslapError::Json(err.to_string())
    }
}

pub type TroutslapResult<T> = std::result::Result<T, TroutslapError>;
