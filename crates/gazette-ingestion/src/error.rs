use gazette_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Article already exists for link: {0}")]
    DuplicateLink(String),

    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, IngestionError>;
