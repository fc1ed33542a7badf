//! Error types raised by catalog store implementations.

use thiserror::Error;

/// Errors surfaced by catalog store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("catalog store lock was poisoned")]
    LockPoisoned,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
