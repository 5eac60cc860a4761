//! Ingestion service: deduplicated persistence of candidate articles.
//!
//! Handles:
//! - Single save, rejecting an already-present link with `DuplicateLink`
//! - Batch save for one topic, silently skipping present or repeated links
//! - Storage-level duplicate rejections treated as already-covered links

use std::sync::Arc;

use gazette_common::{Article, CandidateArticle, NewArticle, Topic};
use gazette_db::{ArticleStore, DbError, TopicStore};
use tracing::{debug, info};
use uuid::Uuid;

use crate::dedup::filter_new_links;
use crate::error::{IngestionError, Result};

#[derive(Clone)]
pub struct IngestionService {
    articles: Arc<dyn ArticleStore>,
    topics: Arc<dyn TopicStore>,
}

impl IngestionService {
    pub fn new(articles: Arc<dyn ArticleStore>, topics: Arc<dyn TopicStore>) -> Self {
        Self { articles, topics }
    }

    pub fn articles(&self) -> Arc<dyn ArticleStore> {
        self.articles.clone()
    }

    async fn resolve_topic(&self, id: Uuid) -> Result<Topic> {
        match self.topics.get_topic(id).await {
            Ok(topic) => Ok(topic),
            Err(DbError::NotFound(_)) => Err(IngestionError::TopicNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist one candidate.
    ///
    /// The link check runs before the insert; a store that still reports a
    /// duplicate (concurrent writer) surfaces the same `DuplicateLink` error.
    pub async fn save(&self, candidate: &CandidateArticle) -> Result<Article> {
        if self.articles.exists_by_original_link(&candidate.original_link).await? {
            return Err(IngestionError::DuplicateLink(candidate.original_link.clone()));
        }

        let topic_id = candidate
            .topic_id
            .ok_or_else(|| IngestionError::TopicNotFound("unassigned".to_string()))?;
        let topic = self.resolve_topic(topic_id).await?;

        match self.articles.insert(NewArticle::from_candidate(topic.id, candidate)).await {
            Ok(article) => {
                debug!(article_id = %article.id, link = %article.original_link, "Saved article");
                Ok(article)
            }
            Err(DbError::Duplicate(link)) => Err(IngestionError::DuplicateLink(link)),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist a batch of candidates for one topic.
    ///
    /// The topic is resolved once; a missing topic fails the whole batch.
    /// Candidates whose link already exists (or repeats within the batch)
    /// are skipped without error. Returns the newly inserted articles.
    pub async fn save_all(&self, topic_id: Uuid, candidates: Vec<CandidateArticle>) -> Result<Vec<Article>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let topic = self.resolve_topic(topic_id).await?;

        let links: Vec<String> = candidates.iter().map(|c| c.original_link.clone()).collect();
        let existing = self.articles.find_existing_links(&links).await?;
        let (fresh, skipped) = filter_new_links(candidates, &existing);

        let mut inserted = Vec::with_capacity(fresh.len());
        let mut raced = 0usize;
        for candidate in &fresh {
            match self.articles.insert(NewArticle::from_candidate(topic.id, candidate)).await {
                Ok(article) => inserted.push(article),
                Err(DbError::Duplicate(link)) => {
                    debug!(link = %link, "Link inserted concurrently, skipping");
                    raced += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            topic = %topic.name,
            inserted = inserted.len(),
            duplicates = skipped + raced,
            "Batch saved"
        );
        Ok(inserted)
    }
}
