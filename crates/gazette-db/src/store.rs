//! Storage boundary traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gazette_common::{Article, NewArticle, Topic};
use uuid::Uuid;

use crate::error::Result;

/// Article persistence.
///
/// "Exists" always means a live (non-deleted) row: a link whose only row is
/// soft-deleted is free to be ingested or restored again.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn exists_by_original_link(&self, link: &str) -> Result<bool>;

    /// Subset of `links` that already have a live row.
    async fn find_existing_links(&self, links: &[String]) -> Result<Vec<String>>;

    /// Insert one article. Fails with `DbError::Duplicate` if a live row
    /// with the same link is already present.
    async fn insert(&self, article: NewArticle) -> Result<Article>;

    /// Insert several articles; all-or-nothing.
    async fn insert_batch(&self, articles: Vec<NewArticle>) -> Result<Vec<Article>>;

    /// Articles with `start <= published_at < end`, oldest first.
    async fn find_published_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_deleted: bool,
    ) -> Result<Vec<Article>>;

    async fn soft_delete(&self, id: Uuid) -> Result<()>;

    /// Physically remove every row published in `[start, end)`.
    /// Returns the number of rows removed.
    async fn purge_published_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

/// Read-only view of the topic subsystem.
#[async_trait]
pub trait TopicStore: Send + Sync {
    async fn list_all_topics(&self) -> Result<Vec<Topic>>;

    /// Fails with `DbError::NotFound` when no topic has this id.
    async fn get_topic(&self, id: Uuid) -> Result<Topic>;
}
