//! Startup and runtime errors of the server process
//!
//! Request-level failures use [`AppError`](crate::utils::AppError); this
//! type covers what can stop the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::utils::AppError> for ServerError {
    fn from(err: crate::utils::AppError) -> Self {
        ServerError::Storage(err.message)
    }
}

impl From<crate::db::repository::RepoError> for ServerError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        ServerError::Storage(err.to_string())
    }
}

/// Result type for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
