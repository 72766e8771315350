//! Error types for the Harbor console

use thiserror::Error;

use crate::http::client::ApiError;

/// Main error type for the Harbor console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::Internal(err.to_string())
    }
}
