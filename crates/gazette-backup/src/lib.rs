//! gazette-backup — Date-partitioned backup and restore of articles.
//!
//! A backup run projects one day of live articles into flat
//! [`SnapshotRecord`](gazette_common::SnapshotRecord)s and writes them to a
//! [`SnapshotStore`] under that date. A restore run replays a range of days,
//! inserting only the articles whose link is not already present.

pub mod backup;
pub mod error;
pub mod restore;
pub mod snapshot;

pub use backup::BackupService;
pub use error::{BackupError, Result};
pub use restore::RestoreService;
pub use snapshot::{FsSnapshotStore, MemorySnapshotStore, SnapshotError, SnapshotStore};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// `[date 00:00Z, date+1 00:00Z)`.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
    (start, start + chrono::Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_window_spans_one_utc_day() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let (start, end) = day_window(date);
        assert_eq!(start.to_rfc3339(), "2025-07-20T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-07-21T00:00:00+00:00");
    }
}
