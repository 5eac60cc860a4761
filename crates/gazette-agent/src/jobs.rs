//! Scheduled jobs: periodic collection and the daily backup.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use gazette_backup::BackupService;
use gazette_ingestion::ArticleCollector;

use crate::scheduler::{JobResult, SchedulerJob};

/// Runs a full collection pass over every topic.
pub struct CollectJob {
    collector: Arc<ArticleCollector>,
    interval: Duration,
}

impl CollectJob {
    pub fn new(collector: Arc<ArticleCollector>, interval: Duration) -> Self {
        Self { collector, interval }
    }
}

#[async_trait]
impl SchedulerJob for CollectJob {
    fn name(&self) -> &'static str {
        "Collect"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> JobResult {
        let summary = self.collector.collect_articles().await;
        if !summary.errors.is_empty() {
            tracing::warn!(run_id = %summary.run_id, errors = ?summary.errors, "Collection finished with errors");
        }
        Ok(())
    }
}

/// Backs up the previous UTC day.
///
/// Does not run at startup: a freshly started process holds no articles yet,
/// and a run then would replace yesterday's snapshot with an empty one.
pub struct BackupJob {
    backup: BackupService,
    interval: Duration,
}

impl BackupJob {
    pub fn new(backup: BackupService, interval: Duration) -> Self {
        Self { backup, interval }
    }
}

fn previous_day(now: DateTime<Utc>) -> Option<NaiveDate> {
    now.date_naive().pred_opt()
}

#[async_trait]
impl SchedulerJob for BackupJob {
    fn name(&self) -> &'static str {
        "DailyBackup"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn run_on_start(&self) -> bool {
        false
    }

    async fn execute(&self) -> JobResult {
        let date = previous_day(Utc::now()).context("no day before today")?;
        let count = self
            .backup
            .backup_by_date(date)
            .await
            .with_context(|| format!("backup of {date} failed"))?;
        tracing::info!(%date, count, "Daily backup written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gazette_backup::{MemorySnapshotStore, SnapshotStore};
    use gazette_common::NewArticle;
    use gazette_common::SnapshotRecord;
    use gazette_db::{ArticleStore, MemoryArticleStore};
    use uuid::Uuid;

    use crate::scheduler::Scheduler;

    #[test]
    fn test_previous_day_crosses_month() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 5, 0).unwrap();
        assert_eq!(previous_day(now), NaiveDate::from_ymd_opt(2025, 7, 31));
    }

    #[tokio::test]
    async fn test_backup_job_snapshots_yesterday() {
        let articles = Arc::new(MemoryArticleStore::new());
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let yesterday = previous_day(Utc::now()).unwrap();
        let published_at = Utc.from_utc_datetime(&yesterday.and_hms_opt(12, 0, 0).unwrap());

        articles
            .insert(NewArticle {
                topic_id: None,
                source: "hankyung".to_string(),
                original_link: "https://x/yesterday".to_string(),
                title: "t".to_string(),
                summary: String::new(),
                published_at,
                comment_count: 0,
                view_count: 0,
            })
            .await
            .unwrap();

        let job = BackupJob::new(BackupService::new(articles, snapshots.clone()), Duration::from_secs(60));
        job.execute().await.unwrap();

        let snapshot = snapshots.read_snapshot(yesterday).await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].original_link, "https://x/yesterday");
    }

    #[tokio::test]
    async fn test_restart_keeps_yesterdays_snapshot() {
        let yesterday = previous_day(Utc::now()).unwrap();
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let kept = SnapshotRecord {
            id: Uuid::new_v4(),
            source: "hankyung".to_string(),
            original_link: "https://x/kept".to_string(),
            title: "t".to_string(),
            published_at: Utc.from_utc_datetime(&yesterday.and_hms_opt(9, 0, 0).unwrap()),
            summary: String::new(),
            comment_count: 0,
            view_count: 0,
            deleted: false,
        };
        snapshots.write_snapshot(yesterday, &[kept]).await.unwrap();

        // Same wiring as startup: empty article store, scheduler started.
        let backup = BackupService::new(Arc::new(MemoryArticleStore::new()), snapshots.clone());
        let scheduler = Scheduler::new().with_job(BackupJob::new(backup, Duration::from_secs(3600)));
        let handles = scheduler.start();
        tokio::time::sleep(Duration::from_millis(200)).await;
        for h in handles {
            h.abort();
        }

        let snapshot = snapshots.read_snapshot(yesterday).await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].original_link, "https://x/kept");
    }
}
