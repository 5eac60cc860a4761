/// Core entity types shared by the ingestion, backup and restore pipelines.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Topic (owned by the topic subsystem, read-only here)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    pub keywords: Vec<String>,
}

impl Topic {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self { id: Uuid::new_v4(), name: name.into(), keywords }
    }
}

// ---------------------------------------------------------------------------
// Candidate article (fetcher output, never persisted as-is)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateArticle {
    /// Unset until the orchestrator stamps the batch with its topic.
    pub topic_id: Option<Uuid>,
    pub source: String,
    pub original_link: String,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Article (persisted)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: Uuid,
    /// `None` for rows replayed from a snapshot, which carries no topic.
    pub topic_id: Option<Uuid>,
    pub source: String,
    pub original_link: String,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub comment_count: i64,
    pub view_count: i64,
    pub deleted: bool,
    pub version: i64,
}

/// Insert payload; the store assigns `id` and `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub topic_id: Option<Uuid>,
    pub source: String,
    pub original_link: String,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub comment_count: i64,
    pub view_count: i64,
}

impl NewArticle {
    pub fn from_candidate(topic_id: Uuid, candidate: &CandidateArticle) -> Self {
        Self {
            topic_id: Some(topic_id),
            source: candidate.source.clone(),
            original_link: candidate.original_link.clone(),
            title: candidate.title.clone(),
            summary: candidate.summary.clone(),
            published_at: candidate.published_at,
            comment_count: 0,
            view_count: 0,
        }
    }

    /// Rebuild an insert payload from a snapshot record. The original `id`
    /// and `deleted` flag are not carried over: the store assigns a fresh id
    /// and the row starts live.
    pub fn from_snapshot(record: &SnapshotRecord) -> Self {
        Self {
            topic_id: None,
            source: record.source.clone(),
            original_link: record.original_link.clone(),
            title: record.title.clone(),
            summary: record.summary.clone(),
            published_at: record.published_at,
            comment_count: record.comment_count,
            view_count: record.view_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Backup snapshot projection
// ---------------------------------------------------------------------------

/// Flattened article as written to a date-keyed snapshot. Carries no
/// relational references so a snapshot can be replayed into an empty store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    pub id: Uuid,
    pub source: String,
    pub original_link: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub summary: String,
    pub comment_count: i64,
    pub view_count: i64,
    pub deleted: bool,
}

impl From<&Article> for SnapshotRecord {
    fn from(a: &Article) -> Self {
        Self {
            id: a.id,
            source: a.source.clone(),
            original_link: a.original_link.clone(),
            title: a.title.clone(),
            published_at: a.published_at,
            summary: a.summary.clone(),
            comment_count: a.comment_count,
            view_count: a.view_count,
            deleted: a.deleted,
        }
    }
}

// ---------------------------------------------------------------------------
// Restore outcome
// ---------------------------------------------------------------------------

/// Outcome of restoring a single day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreResult {
    pub date: NaiveDate,
    pub restored_ids: Vec<Uuid>,
    pub count: usize,
    /// Set when the day could not be restored; the range carries on regardless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RestoreResult {
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, restored_ids: Vec::new(), count: 0, error: None }
    }

    pub fn restored(date: NaiveDate, restored_ids: Vec<Uuid>) -> Self {
        let count = restored_ids.len();
        Self { date, restored_ids, count, error: None }
    }

    pub fn failed(date: NaiveDate, error: impl Into<String>) -> Self {
        Self { date, restored_ids: Vec::new(), count: 0, error: Some(error.into()) }
    }

    /// The day failed after some rows were already inserted.
    pub fn partial(date: NaiveDate, restored_ids: Vec<Uuid>, error: impl Into<String>) -> Self {
        let count = restored_ids.len();
        Self { date, restored_ids, count, error: Some(error.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_record_flattens_article() {
        let article = Article {
            id: Uuid::new_v4(),
            topic_id: Some(Uuid::new_v4()),
            source: "hankyung".to_string(),
            original_link: "https://example.com/a".to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            published_at: Utc::now(),
            comment_count: 3,
            view_count: 40,
            deleted: false,
            version: 2,
        };
        let record = SnapshotRecord::from(&article);
        assert_eq!(record.id, article.id);
        assert_eq!(record.original_link, article.original_link);
        assert_eq!(record.comment_count, 3);
        assert_eq!(record.view_count, 40);
    }

    #[test]
    fn test_restore_result_count_matches_ids() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let r = RestoreResult::restored(date, vec![Uuid::new_v4(), Uuid::new_v4()]);
        assert_eq!(r.count, 2);
        assert!(r.error.is_none());
        assert_eq!(RestoreResult::empty(date).count, 0);
    }
}
