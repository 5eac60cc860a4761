//! Backup and restore error types.

use chrono::NaiveDate;
use gazette_db::DbError;
use thiserror::Error;

use crate::snapshot::SnapshotError;

pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Invalid range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl BackupError {
    /// Store-level outage; a multi-day restore stops instead of moving on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BackupError::Storage(e) if e.is_fatal())
    }
}
