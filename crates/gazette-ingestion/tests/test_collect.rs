//! Collection orchestrator behaviour with in-process sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gazette_common::{Article, CandidateArticle, NewArticle, Topic};
use gazette_db::{ArticleStore, MemoryArticleStore, MemoryTopicStore, Result as DbResult};
use gazette_ingestion::sources::ArticleSource;
use gazette_ingestion::{ArticleCollector, CollectorConfig, IngestionService};
use uuid::Uuid;

/// Returns one candidate per call, link derived from the topic name.
struct StaticSource {
    name: &'static str,
}

#[async_trait]
impl ArticleSource for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self, topic: &Topic, keyword: &str) -> Vec<CandidateArticle> {
        vec![CandidateArticle {
            topic_id: None,
            source: self.name.to_string(),
            original_link: format!("https://{}/{}/{}", self.name, topic.name, keyword),
            title: format!("{} news", keyword),
            summary: String::new(),
            published_at: Utc::now(),
        }]
    }

    async fn fetch_any(&self, topic: &Topic, _keywords: &[String]) -> Vec<CandidateArticle> {
        self.fetch(topic, &topic.name).await
    }
}

/// A source that blows up.
struct PanickingSource;

#[async_trait]
impl ArticleSource for PanickingSource {
    fn name(&self) -> &str {
        "broken"
    }

    async fn fetch(&self, _topic: &Topic, _keyword: &str) -> Vec<CandidateArticle> {
        panic!("feed exploded");
    }

    async fn fetch_any(&self, _topic: &Topic, _keywords: &[String]) -> Vec<CandidateArticle> {
        panic!("feed exploded");
    }
}

/// A source that never answers.
struct HangingSource;

#[async_trait]
impl ArticleSource for HangingSource {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn fetch(&self, _topic: &Topic, _keyword: &str) -> Vec<CandidateArticle> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Vec::new()
    }

    async fn fetch_any(&self, _topic: &Topic, _keywords: &[String]) -> Vec<CandidateArticle> {
        Vec::new()
    }
}

/// Memory store that counts lookups, to observe whether a save ran.
#[derive(Default)]
struct CountingStore {
    inner: MemoryArticleStore,
    lookups: AtomicUsize,
}

#[async_trait]
impl ArticleStore for CountingStore {
    async fn exists_by_original_link(&self, link: &str) -> DbResult<bool> {
        self.inner.exists_by_original_link(link).await
    }
    async fn find_existing_links(&self, links: &[String]) -> DbResult<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_existing_links(links).await
    }
    async fn insert(&self, article: NewArticle) -> DbResult<Article> {
        self.inner.insert(article).await
    }
    async fn insert_batch(&self, articles: Vec<NewArticle>) -> DbResult<Vec<Article>> {
        self.inner.insert_batch(articles).await
    }
    async fn find_published_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_deleted: bool,
    ) -> DbResult<Vec<Article>> {
        self.inner.find_published_between(start, end, exclude_deleted).await
    }
    async fn soft_delete(&self, id: Uuid) -> DbResult<()> {
        self.inner.soft_delete(id).await
    }
    async fn purge_published_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<usize> {
        self.inner.purge_published_between(start, end).await
    }
    async fn count(&self) -> DbResult<usize> {
        self.inner.count().await
    }
}

fn collector(
    sources: Vec<Arc<dyn ArticleSource>>,
    topics: Vec<Topic>,
    store: Arc<CountingStore>,
) -> ArticleCollector {
    let topics = Arc::new(MemoryTopicStore::new(topics));
    let ingestion = IngestionService::new(store, topics.clone());
    let config = CollectorConfig {
        fetch_timeout: Duration::from_millis(200),
        ..Default::default()
    };
    ArticleCollector::new(sources, topics, ingestion, config)
}

#[tokio::test]
async fn test_no_topics_short_circuits() {
    let store = Arc::new(CountingStore::default());
    let c = collector(vec![Arc::new(StaticSource { name: "a" })], vec![], store.clone());

    let summary = c.collect_articles().await;

    assert_eq!(summary.topics, 0);
    assert!(summary.errors.is_empty());
    assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failing_source_does_not_block_others() {
    let store = Arc::new(CountingStore::default());
    let t1 = Topic::new("AI", vec![]);
    let c = collector(
        vec![Arc::new(PanickingSource), Arc::new(StaticSource { name: "b" })],
        vec![t1.clone()],
        store.clone(),
    );

    let summary = c.collect_articles().await;

    assert_eq!(summary.failed_fetches, 1);
    assert_eq!(summary.inserted, 1);
    let rows = store.inner.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "b");
    assert_eq!(rows[0].topic_id, Some(t1.id));
}

#[tokio::test]
async fn test_hung_source_is_timed_out() {
    let store = Arc::new(CountingStore::default());
    let c = collector(
        vec![Arc::new(HangingSource), Arc::new(StaticSource { name: "b" })],
        vec![Topic::new("AI", vec![])],
        store.clone(),
    );

    let summary = c.collect_articles().await;

    assert_eq!(summary.failed_fetches, 1);
    assert_eq!(summary.inserted, 1);
}

#[tokio::test]
async fn test_topic_without_candidates_skips_save() {
    let store = Arc::new(CountingStore::default());
    let c = collector(
        vec![Arc::new(PanickingSource)],
        vec![Topic::new("AI", vec![]), Topic::new("Chips", vec![])],
        store.clone(),
    );

    let summary = c.collect_articles().await;

    assert_eq!(summary.topics, 2);
    assert_eq!(summary.failed_fetches, 2);
    assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_sources_registered_skips_save() {
    let store = Arc::new(CountingStore::default());
    let c = collector(vec![], vec![Topic::new("AI", vec![])], store.clone());

    let summary = c.collect_articles().await;

    assert_eq!(summary.topics, 1);
    assert_eq!(summary.inserted, 0);
    assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_second_run_inserts_nothing_new() {
    let store = Arc::new(CountingStore::default());
    let c = collector(
        vec![Arc::new(StaticSource { name: "a" }), Arc::new(StaticSource { name: "b" })],
        vec![Topic::new("AI", vec![]), Topic::new("Chips", vec![]), Topic::new("EV", vec![])],
        store.clone(),
    );

    let first = c.collect_articles().await;
    let second = c.collect_articles().await;

    assert_eq!(first.inserted, 6);
    assert_eq!(second.candidates, 6);
    assert_eq!(second.inserted, 0);
    assert_eq!(store.count().await.unwrap(), 6);
}

#[tokio::test]
async fn test_collect_single_topic() {
    let store = Arc::new(CountingStore::default());
    let ai = Topic::new("AI", vec![]);
    let chips = Topic::new("Chips", vec![]);
    let c = collector(vec![Arc::new(StaticSource { name: "a" })], vec![ai.clone(), chips], store.clone());

    let summary = c.collect_topic_by_id(ai.id).await.unwrap();

    assert_eq!(summary.topics, 1);
    assert_eq!(summary.inserted, 1);
    let rows = store.inner.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].topic_id, Some(ai.id));
}

#[tokio::test]
async fn test_collect_unknown_topic_fails() {
    let store = Arc::new(CountingStore::default());
    let c = collector(vec![Arc::new(StaticSource { name: "a" })], vec![], store.clone());

    let err = c.collect_topic_by_id(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, gazette_ingestion::IngestionError::TopicNotFound(_)));
    assert_eq!(store.count().await.unwrap(), 0);
}
