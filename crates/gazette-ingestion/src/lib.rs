//! gazette-ingestion — Article ingestion pipeline.
//! Covers:
//! - Source fetchers (RSS feeds, keyed search API)
//! - Keyword filtering and link deduplication
//! - Ingestion service (single and batch save)
//! - Collection orchestrator with bounded fetch concurrency

pub mod sources;
pub mod dedup;
pub mod error;
pub mod models;
pub mod repository;
pub mod pipeline;

pub use error::IngestionError;
pub use pipeline::{ArticleCollector, CollectSummary, CollectorConfig};
pub use repository::IngestionService;
