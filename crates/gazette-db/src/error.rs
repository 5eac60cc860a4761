//! Database error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl DbError {
    /// Whether the store itself is down, as opposed to a single bad request.
    /// Multi-day operations stop on fatal errors instead of moving on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DbError::Unavailable(_))
    }
}
