//! Backup service: one day of live articles into one snapshot.

use std::sync::Arc;

use chrono::NaiveDate;
use gazette_common::SnapshotRecord;
use gazette_db::ArticleStore;
use tracing::{info, instrument};

use crate::day_window;
use crate::error::Result;
use crate::snapshot::SnapshotStore;

#[derive(Clone)]
pub struct BackupService {
    articles: Arc<dyn ArticleStore>,
    snapshots: Arc<dyn SnapshotStore>,
}

impl BackupService {
    pub fn new(articles: Arc<dyn ArticleStore>, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self { articles, snapshots }
    }

    /// Snapshot every non-deleted article published on `date` (UTC),
    /// replacing any earlier snapshot for that date. Returns the number of
    /// records written. A failed write is returned as is; no retry.
    #[instrument(skip(self))]
    pub async fn backup_by_date(&self, date: NaiveDate) -> Result<usize> {
        let (start, end) = day_window(date);
        let articles = self.articles.find_published_between(start, end, true).await?;

        let records: Vec<SnapshotRecord> = articles.iter().map(SnapshotRecord::from).collect();
        self.snapshots.write_snapshot(date, &records).await?;

        info!(%date, count = records.len(), "Backup complete");
        Ok(records.len())
    }
}
