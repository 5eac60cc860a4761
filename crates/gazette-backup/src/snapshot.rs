//! Snapshot store boundary and its implementations.
//!
//! A snapshot is the full set of records for one calendar day. Writing a
//! date replaces whatever was stored for it; there is no merge.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use gazette_common::SnapshotRecord;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store `records` under `date`, replacing any prior snapshot.
    async fn write_snapshot(&self, date: NaiveDate, records: &[SnapshotRecord]) -> Result<(), SnapshotError>;

    /// `Ok(None)` when nothing was ever written for `date`.
    async fn read_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<SnapshotRecord>>, SnapshotError>;
}

/// One JSON file per day: `<dir>/snapshot-YYYY-MM-DD.json`.
///
/// Writes for the same date are serialized within the process, and each
/// write lands in a temp file that is renamed over the target, so readers
/// see either the old snapshot or the new one.
pub struct FsSnapshotStore {
    dir: PathBuf,
    locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl FsSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), locks: Mutex::new(HashMap::new()) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("snapshot-{}.json", date.format("%Y-%m-%d")))
    }

    async fn lock_for(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(date).or_default().clone()
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn write_snapshot(&self, date: NaiveDate, records: &[SnapshotRecord]) -> Result<(), SnapshotError> {
        let body = serde_json::to_vec_pretty(records)?;

        let lock = self.lock_for(date).await;
        let _guard = lock.lock().await;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(date);
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &body).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        debug!(%date, records = records.len(), path = %path.display(), "Snapshot written");
        Ok(())
    }

    async fn read_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<SnapshotRecord>>, SnapshotError> {
        let path = self.path_for(date);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

/// Snapshots held in a map; used by tests and when no directory is configured.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<NaiveDate, Vec<SnapshotRecord>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<_> = self.snapshots.read().await.keys().copied().collect();
        dates.sort();
        dates
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn write_snapshot(&self, date: NaiveDate, records: &[SnapshotRecord]) -> Result<(), SnapshotError> {
        self.snapshots.write().await.insert(date, records.to_vec());
        Ok(())
    }

    async fn read_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<SnapshotRecord>>, SnapshotError> {
        Ok(self.snapshots.read().await.get(&date).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(link: &str) -> SnapshotRecord {
        SnapshotRecord {
            id: Uuid::new_v4(),
            source: "hankyung".to_string(),
            original_link: link.to_string(),
            title: "t".to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 7, 20, 8, 0, 0).unwrap(),
            summary: String::new(),
            comment_count: 1,
            view_count: 2,
            deleted: false,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 20).unwrap()
    }

    #[tokio::test]
    async fn test_fs_store_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path().join("snapshots"));

        assert!(store.read_snapshot(date()).await.unwrap().is_none());

        store.write_snapshot(date(), &[record("a"), record("b")]).await.unwrap();
        assert!(store.path_for(date()).ends_with("snapshot-2025-07-20.json"));
        assert_eq!(store.read_snapshot(date()).await.unwrap().unwrap().len(), 2);

        store.write_snapshot(date(), &[record("c")]).await.unwrap();
        let records = store.read_snapshot(date()).await.unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_link, "c");

        // No temp file left behind.
        let names: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["snapshot-2025-07-20.json".to_string()]);
    }

    #[tokio::test]
    async fn test_fs_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());
        std::fs::write(store.path_for(date()), b"{ not json").unwrap();

        let err = store.read_snapshot(date()).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_fs_store_concurrent_writes_same_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsSnapshotStore::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let records: Vec<_> = (0..=i).map(|j| record(&format!("{i}-{j}"))).collect();
                    store.write_snapshot(date(), &records).await.unwrap();
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }

        // Whichever write landed last, the file holds one complete snapshot.
        let records = store.read_snapshot(date()).await.unwrap().unwrap();
        let prefix = records[0].original_link.split('-').next().unwrap().to_string();
        assert!(records.iter().all(|r| r.original_link.starts_with(&format!("{prefix}-"))));
        assert_eq!(records.len(), prefix.parse::<usize>().unwrap() + 1);
    }

    #[tokio::test]
    async fn test_memory_store_replaces_snapshot() {
        let store = MemorySnapshotStore::new();
        store.write_snapshot(date(), &[record("a"), record("b")]).await.unwrap();
        store.write_snapshot(date(), &[]).await.unwrap();
        assert_eq!(store.read_snapshot(date()).await.unwrap(), Some(vec![]));
        assert_eq!(store.dates().await, vec![date()]);
    }
}
