//! In-memory stores.
//!
//! Rows live behind a `tokio::sync::RwLock`; every check-then-write happens
//! under the write lock, so the live-link uniqueness backstop holds under
//! concurrent writers.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gazette_common::{Article, NewArticle, Topic};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::store::{ArticleStore, TopicStore};

/// Article store backed by a `Vec`, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    rows: RwLock<Vec<Article>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row, deleted ones included.
    pub async fn all(&self) -> Vec<Article> {
        self.rows.read().await.clone()
    }

    fn materialise(article: NewArticle) -> Article {
        Article {
            id: Uuid::new_v4(),
            topic_id: article.topic_id,
            source: article.source,
            original_link: article.original_link,
            title: article.title,
            summary: article.summary,
            published_at: article.published_at,
            comment_count: article.comment_count,
            view_count: article.view_count,
            deleted: false,
            version: 0,
        }
    }

    fn live_links(rows: &[Article]) -> HashSet<&str> {
        rows.iter()
            .filter(|a| !a.deleted)
            .map(|a| a.original_link.as_str())
            .collect()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn exists_by_original_link(&self, link: &str) -> Result<bool> {
        let rows = self.rows.read().await;
        Ok(rows.iter().any(|a| !a.deleted && a.original_link == link))
    }

    async fn find_existing_links(&self, links: &[String]) -> Result<Vec<String>> {
        let rows = self.rows.read().await;
        let live = Self::live_links(&rows);
        let mut seen = HashSet::new();
        Ok(links
            .iter()
            .filter(|l| live.contains(l.as_str()) && seen.insert(l.as_str()))
            .cloned()
            .collect())
    }

    async fn insert(&self, article: NewArticle) -> Result<Article> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|a| !a.deleted && a.original_link == article.original_link) {
            return Err(DbError::Duplicate(article.original_link));
        }
        let article = Self::materialise(article);
        rows.push(article.clone());
        tracing::debug!(article_id = %article.id, link = %article.original_link, "Inserted article");
        Ok(article)
    }

    async fn insert_batch(&self, articles: Vec<NewArticle>) -> Result<Vec<Article>> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = self.rows.write().await;
        {
            let mut live: HashSet<String> = Self::live_links(&rows)
                .into_iter()
                .map(String::from)
                .collect();
            for a in &articles {
                if !live.insert(a.original_link.clone()) {
                    return Err(DbError::Duplicate(a.original_link.clone()));
                }
            }
        }

        let inserted: Vec<Article> = articles.into_iter().map(Self::materialise).collect();
        rows.extend(inserted.iter().cloned());
        tracing::debug!("insert_batch: inserted {} articles", inserted.len());
        Ok(inserted)
    }

    async fn find_published_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_deleted: bool,
    ) -> Result<Vec<Article>> {
        if start > end {
            return Err(DbError::InvalidQuery(format!("start {} is after end {}", start, end)));
        }
        let rows = self.rows.read().await;
        let mut found: Vec<Article> = rows
            .iter()
            .filter(|a| a.published_at >= start && a.published_at < end)
            .filter(|a| !(exclude_deleted && a.deleted))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.published_at);
        Ok(found)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let mut rows = self.rows.write().await;
        let article = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;
        if !article.deleted {
            article.deleted = true;
            article.version += 1;
        }
        Ok(())
    }

    async fn purge_published_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|a| !(a.published_at >= start && a.published_at < end));
        Ok(before - rows.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.rows.read().await.len())
    }
}

/// Fixed topic list, e.g. seeded from configuration.
#[derive(Debug, Default)]
pub struct MemoryTopicStore {
    topics: RwLock<Vec<Topic>>,
}

impl MemoryTopicStore {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics: RwLock::new(topics) }
    }

    pub async fn add(&self, topic: Topic) {
        self.topics.write().await.push(topic);
    }
}

#[async_trait]
impl TopicStore for MemoryTopicStore {
    async fn list_all_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.topics.read().await.clone())
    }

    async fn get_topic(&self, id: Uuid) -> Result<Topic> {
        self.topics
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("topic {}", id)))
    }
}
