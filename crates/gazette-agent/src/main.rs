//! Gazette — news article collection and backup service.
//!
//! Entry point. Loads configuration, wires the sources, stores and services,
//! starts the recurring jobs and serves the operational HTTP API.

mod config;
mod jobs;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use gazette_backup::{BackupService, FsSnapshotStore, RestoreService};
use gazette_common::{FetchClient, Topic};
use gazette_db::{MemoryArticleStore, MemoryTopicStore};
use gazette_ingestion::sources::{ArticleSource, RssSource, SearchApiSource};
use gazette_ingestion::{ArticleCollector, CollectorConfig, IngestionService};
use gazette_web::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::jobs::{BackupJob, CollectJob};
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gazette=debug,info")),
        )
        .init();

    info!("Gazette starting up...");

    let config = Config::load()?;

    let client = build_fetch_client(&config)?;
    let sources = build_sources(&config, &client);
    info!("Registered {} article sources", sources.len());

    let topics: Vec<Topic> = config
        .topics
        .iter()
        .map(|seed| Topic::new(seed.name.clone(), seed.keywords.clone()))
        .collect();
    info!("Seeded {} topics", topics.len());

    let articles = Arc::new(MemoryArticleStore::new());
    let topic_store = Arc::new(MemoryTopicStore::new(topics));
    let snapshots = Arc::new(FsSnapshotStore::new(config.backup.snapshot_dir.clone()));

    let ingestion = IngestionService::new(articles.clone(), topic_store.clone());
    let collector = Arc::new(ArticleCollector::new(
        sources,
        topic_store,
        ingestion,
        CollectorConfig {
            max_concurrent_topics: config.scheduler.max_concurrent_topics,
            max_concurrent_fetches: config.scheduler.max_concurrent_fetches,
            fetch_timeout: Duration::from_secs(config.scheduler.fetch_timeout_secs),
        },
    ));
    let backup = BackupService::new(articles.clone(), snapshots.clone());
    let restore = RestoreService::new(articles, snapshots);

    let scheduler = Scheduler::new()
        .with_job(CollectJob::new(
            collector.clone(),
            Duration::from_secs(config.scheduler.collect_interval_secs),
        ))
        .with_job(BackupJob::new(
            backup.clone(),
            Duration::from_secs(config.scheduler.backup_interval_secs),
        ));
    let _jobs = scheduler.start();
    info!("Started {} scheduled jobs", scheduler.job_count());

    let router = gazette_web::build_router(AppState::new(collector, backup, restore));

    let listener = tokio::net::TcpListener::bind(&config.web.bind).await?;
    info!("API listening on http://{}", config.web.bind);

    axum::serve(listener, router).await?;

    Ok(())
}

/// HTTP client restricted to the hosts named in the source table.
fn build_fetch_client(config: &Config) -> anyhow::Result<FetchClient> {
    let mut client = FetchClient::new(config.http.timeout(), &config.http.user_agent)?;
    for rss in &config.sources.rss {
        client.allow_url(&rss.feed_url)?;
    }
    if let Some(api) = &config.sources.search_api {
        client.allow_url(&api.endpoint)?;
    }
    Ok(client)
}

fn build_sources(config: &Config, client: &FetchClient) -> Vec<Arc<dyn ArticleSource>> {
    let mut sources: Vec<Arc<dyn ArticleSource>> = config
        .sources
        .rss
        .iter()
        .map(|rss| Arc::new(RssSource::new(client.clone(), rss.clone())) as Arc<dyn ArticleSource>)
        .collect();

    match &config.sources.search_api {
        Some(api) if api.client_id.is_empty() || api.client_secret.is_empty() => {
            warn!(
                source = %api.name,
                "Search API has no credentials (set GAZETTE_SEARCH_CLIENT_ID / GAZETTE_SEARCH_CLIENT_SECRET); not registered"
            );
        }
        Some(api) => sources.push(Arc::new(SearchApiSource::new(client.clone(), api.clone()))),
        None => {}
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_api_without_credentials_is_skipped() {
        let mut config = Config::from_toml_str(
            r#"
[[sources.rss]]
name = "hankyung"
feed_url = "https://www.hankyung.com/feed/it"

[sources.search_api]
endpoint = "https://openapi.naver.com/v1/search/news.json"
"#,
        )
        .unwrap();
        let client = build_fetch_client(&config).unwrap();
        let names: Vec<_> = build_sources(&config, &client).iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["hankyung"]);

        config.apply_overrides(|key| match key {
            "GAZETTE_SEARCH_CLIENT_ID" => Some("id".to_string()),
            "GAZETTE_SEARCH_CLIENT_SECRET" => Some("secret".to_string()),
            _ => None,
        });
        let names: Vec<_> = build_sources(&config, &client).iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["hankyung", "naver"]);
    }

    #[test]
    fn test_fetch_client_allows_only_configured_hosts() {
        let config = Config::from_toml_str(
            r#"
[[sources.rss]]
name = "hankyung"
feed_url = "https://www.hankyung.com/feed/it"
"#,
        )
        .unwrap();
        let client = build_fetch_client(&config).unwrap();
        assert!(client.is_allowed("https://www.hankyung.com/feed/economy"));
        assert!(!client.is_allowed("https://evil.example.com/feed"));
    }
}
