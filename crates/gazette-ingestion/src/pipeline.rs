//! Article collection orchestrator.
//!
//! Orchestrates one collection run:
//!   1. Load every topic
//!   2. Query every registered source for each topic (topic name as keyword)
//!   3. Join all fetches of a topic, stamp results with the topic id
//!   4. Hand the batch to `IngestionService::save_all` (skipped when empty)
//!
//! Topics run concurrently up to `max_concurrent_topics`; fetch calls
//! across all topics share a pool of `max_concurrent_fetches` permits. A
//! failing, panicking or hung source only loses its own results.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use gazette_common::{CandidateArticle, Topic};
use gazette_db::{DbError, TopicStore};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{IngestionError, Result};
use crate::repository::IngestionService;
use crate::sources::ArticleSource;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub max_concurrent_topics: usize,
    pub max_concurrent_fetches: usize,
    /// Upper bound on a single `fetch` call, on top of the HTTP timeout.
    pub fetch_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_topics: 2,
            max_concurrent_fetches: 4,
            fetch_timeout: Duration::from_secs(60),
        }
    }
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectSummary {
    pub run_id: Uuid,
    pub topics: usize,
    pub candidates: usize,
    pub inserted: usize,
    pub failed_fetches: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl CollectSummary {
    fn absorb(&mut self, outcomes: Vec<TopicOutcome>) {
        for outcome in outcomes {
            self.candidates += outcome.candidates;
            self.inserted += outcome.inserted;
            self.failed_fetches += outcome.failed_fetches;
            if let Some(err) = outcome.error {
                self.errors.push(err);
            }
        }
    }
}

#[derive(Debug, Default)]
struct TopicOutcome {
    candidates: usize,
    inserted: usize,
    failed_fetches: usize,
    error: Option<String>,
}

// ── Collector ─────────────────────────────────────────────────────────────────

pub struct ArticleCollector {
    sources: Vec<Arc<dyn ArticleSource>>,
    topics: Arc<dyn TopicStore>,
    ingestion: IngestionService,
    config: CollectorConfig,
    fetch_permits: Arc<Semaphore>,
}

impl ArticleCollector {
    pub fn new(
        sources: Vec<Arc<dyn ArticleSource>>,
        topics: Arc<dyn TopicStore>,
        ingestion: IngestionService,
        config: CollectorConfig,
    ) -> Self {
        let fetch_permits = Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1)));
        Self { sources, topics, ingestion, config, fetch_permits }
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Run one collection pass over every topic.
    ///
    /// Never fails: source and topic errors are logged and counted in the
    /// summary, and the remaining topics still run.
    pub async fn collect_articles(&self) -> CollectSummary {
        let run_id = Uuid::new_v4();
        let span = info_span!("collect_articles", %run_id);
        self.run(run_id).instrument(span).await
    }

    async fn run(&self, run_id: Uuid) -> CollectSummary {
        let t0 = Instant::now();
        let mut summary = CollectSummary { run_id, ..Default::default() };

        let topics = match self.topics.list_all_topics().await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Could not load topics");
                summary.errors.push(format!("topic load failed: {e}"));
                summary.duration_ms = t0.elapsed().as_millis() as u64;
                return summary;
            }
        };

        if topics.is_empty() {
            info!("No topics registered, nothing to collect");
            summary.duration_ms = t0.elapsed().as_millis() as u64;
            return summary;
        }

        summary.topics = topics.len();
        info!(topics = topics.len(), sources = self.sources.len(), "Starting collection run");

        let outcomes: Vec<TopicOutcome> = stream::iter(topics)
            .map(|topic| async move { self.collect_topic(&topic).await })
            .buffer_unordered(self.config.max_concurrent_topics.max(1))
            .collect()
            .await;

        summary.absorb(outcomes);
        summary.duration_ms = t0.elapsed().as_millis() as u64;
        info!(
            topics = summary.topics,
            candidates = summary.candidates,
            inserted = summary.inserted,
            failed_fetches = summary.failed_fetches,
            duration_ms = summary.duration_ms,
            "Collection run complete"
        );
        summary
    }

    /// Run one collection pass for a single topic.
    ///
    /// Unlike a full run, an unknown topic is an error for the caller.
    pub async fn collect_topic_by_id(&self, topic_id: Uuid) -> Result<CollectSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("collect_topic", %run_id, %topic_id);
        async move {
            let t0 = Instant::now();
            let topic = match self.topics.get_topic(topic_id).await {
                Ok(topic) => topic,
                Err(DbError::NotFound(_)) => return Err(IngestionError::TopicNotFound(topic_id.to_string())),
                Err(e) => return Err(e.into()),
            };

            let mut summary = CollectSummary { run_id, topics: 1, ..Default::default() };
            summary.absorb(vec![self.collect_topic(&topic).await]);
            summary.duration_ms = t0.elapsed().as_millis() as u64;
            info!(topic = %topic.name, inserted = summary.inserted, "Topic collection complete");
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    async fn collect_topic(&self, topic: &Topic) -> TopicOutcome {
        let mut outcome = TopicOutcome::default();

        // Join every fetch for this topic before persisting anything.
        let fetches = self.sources.iter().map(|source| self.fetch_one(source.clone(), topic.clone()));
        let results = futures::future::join_all(fetches).await;

        let mut batch: Vec<CandidateArticle> = Vec::new();
        for result in results {
            match result {
                Ok(items) => batch.extend(items),
                Err(msg) => {
                    warn!(topic = %topic.name, "{}", msg);
                    outcome.failed_fetches += 1;
                }
            }
        }

        if batch.is_empty() {
            debug!(topic = %topic.name, "No candidates, skipping save");
            return outcome;
        }

        for candidate in &mut batch {
            candidate.topic_id = Some(topic.id);
        }
        outcome.candidates = batch.len();

        match self.ingestion.save_all(topic.id, batch).await {
            Ok(inserted) => outcome.inserted = inserted.len(),
            Err(e) => {
                warn!(topic = %topic.name, error = %e, "Batch save failed");
                outcome.error = Some(format!("topic {}: {e}", topic.name));
            }
        }
        outcome
    }

    /// One fetch on its own task, so a panicking source is contained.
    async fn fetch_one(
        &self,
        source: Arc<dyn ArticleSource>,
        topic: Topic,
    ) -> std::result::Result<Vec<CandidateArticle>, String> {
        let name = source.name().to_string();
        let permit = self
            .fetch_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| format!("source {name}: fetch pool closed"))?;
        let timeout = self.config.fetch_timeout;

        let handle = tokio::spawn(async move {
            let _permit = permit;
            tokio::time::timeout(timeout, source.fetch(&topic, &topic.name)).await
        });

        match handle.await {
            Ok(Ok(items)) => {
                debug!(source = %name, n = items.len(), "Candidates retrieved");
                Ok(items)
            }
            Ok(Err(_)) => Err(format!("source {name}: fetch timed out after {timeout:?}")),
            Err(e) => Err(format!("source {name}: fetch task failed: {e}")),
        }
    }
}
