//! Restore service: replay snapshots for a range of days.
//!
//! Each day is handled on its own. A day whose snapshot is missing or empty
//! yields a zero-count result; a day that fails yields a result carrying the
//! error (and the ids inserted before it) and the range moves on, unless the
//! article store itself is down.
//! Records whose link already has a live row are skipped, so restoring the
//! same range twice inserts nothing the second time.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use gazette_common::{NewArticle, RestoreResult};
use gazette_db::{ArticleStore, DbError};
use tracing::{debug, info, instrument, warn};

use crate::error::{BackupError, Result};
use crate::snapshot::SnapshotStore;

#[derive(Clone)]
pub struct RestoreService {
    articles: Arc<dyn ArticleStore>,
    snapshots: Arc<dyn SnapshotStore>,
}

impl RestoreService {
    pub fn new(articles: Arc<dyn ArticleStore>, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self { articles, snapshots }
    }

    /// Restore every day in `[from, to]`, oldest first; one result per day.
    ///
    /// Fails with `InvalidRange` before any I/O when `from` is after `to`.
    #[instrument(skip(self))]
    pub async fn restore_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<RestoreResult>> {
        if from > to {
            return Err(BackupError::InvalidRange { from, to });
        }

        let mut results = Vec::new();
        for date in from.iter_days().take_while(|d| *d <= to) {
            match self.restore_day(date).await {
                Ok(result) => results.push(result),
                Err(e) if e.is_fatal() => {
                    warn!(%date, error = %e, "Article store unavailable, aborting restore");
                    return Err(e);
                }
                Err(e) => {
                    warn!(%date, error = %e, "Restore failed for day");
                    results.push(RestoreResult::failed(date, e.to_string()));
                }
            }
        }

        let restored: usize = results.iter().map(|r| r.count).sum();
        let failed = results.iter().filter(|r| r.error.is_some()).count();
        info!(days = results.len(), restored, failed, "Restore complete");
        Ok(results)
    }

    async fn restore_day(&self, date: NaiveDate) -> Result<RestoreResult> {
        let records = match self.snapshots.read_snapshot(date).await? {
            Some(records) if !records.is_empty() => records,
            _ => {
                debug!(%date, "No snapshot to restore");
                return Ok(RestoreResult::empty(date));
            }
        };

        let mut links: Vec<String> = records.iter().map(|r| r.original_link.clone()).collect();
        links.sort();
        links.dedup();
        let existing: HashSet<String> = self.articles.find_existing_links(&links).await?.into_iter().collect();

        let mut seen = HashSet::new();
        let mut restored_ids = Vec::new();
        for record in &records {
            if existing.contains(&record.original_link) || !seen.insert(record.original_link.as_str()) {
                continue;
            }
            match self.articles.insert(NewArticle::from_snapshot(record)).await {
                Ok(article) => restored_ids.push(article.id),
                Err(DbError::Duplicate(link)) => {
                    debug!(%date, %link, "Link appeared during restore, skipping");
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    // Rows inserted so far stay; report them with the error.
                    warn!(%date, restored = restored_ids.len(), error = %e, "Restore stopped part-way through day");
                    let err = BackupError::from(e);
                    return Ok(RestoreResult::partial(date, restored_ids, err.to_string()));
                }
            }
        }

        debug!(
            %date,
            snapshot = records.len(),
            restored = restored_ids.len(),
            "Day restored"
        );
        Ok(RestoreResult::restored(date, restored_ids))
    }
}
