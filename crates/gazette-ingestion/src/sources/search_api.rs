//! Keyed news search API client (Naver-style).
//!
//! Endpoint example: https://openapi.naver.com/v1/search/news.json
//! Authentication: client id and secret sent as request headers.

use anyhow::Context;
use async_trait::async_trait;
use gazette_common::{CandidateArticle, FetchClient, Topic};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{clean_markup, ArticleSource};
use crate::dedup::contains_any_keyword;
use crate::models::{DateFormat, SearchApiConfig};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    originallink: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

pub struct SearchApiSource {
    client: FetchClient,
    config: SearchApiConfig,
}

impl SearchApiSource {
    pub fn new(client: FetchClient, config: SearchApiConfig) -> Self {
        Self { client, config }
    }

    /// Query the API; `Ok(vec![])` for an empty body.
    #[instrument(skip(self), fields(source = %self.config.name))]
    async fn search(&self, query: &str) -> anyhow::Result<Vec<CandidateArticle>> {
        let params = [
            ("query", query.to_string()),
            ("display", self.config.page_size.to_string()),
            ("sort", self.config.sort.clone()),
        ];

        let resp = self
            .client
            .get(&self.config.endpoint)?
            .header(self.config.id_header.as_str(), self.config.client_id.as_str())
            .header(self.config.secret_header.as_str(), self.config.client_secret.as_str())
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body = resp.text().await?;
        if body.trim().is_empty() {
            debug!("Search API returned an empty body");
            return Ok(Vec::new());
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).context("search API response is not valid JSON")?;
        debug!(count = parsed.items.len(), "Search API returned items");

        Ok(parsed
            .items
            .into_iter()
            .filter_map(|item| self.to_candidate(item))
            .collect())
    }

    fn to_candidate(&self, item: SearchItem) -> Option<CandidateArticle> {
        let link = if item.originallink.trim().is_empty() { item.link } else { item.originallink };
        let link = link.trim().to_string();
        if link.is_empty() {
            return None;
        }

        Some(CandidateArticle {
            topic_id: None,
            source: self.config.name.clone(),
            original_link: link,
            title: clean_markup(&item.title),
            summary: clean_markup(&item.description),
            published_at: DateFormat::Rfc2822.parse_or_now(item.pub_date.as_deref()),
        })
    }

    async fn search_or_empty(&self, topic: &Topic, query: &str) -> Vec<CandidateArticle> {
        match self.search(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!(source = %self.config.name, topic = %topic.name, error = %e, "Search API fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ArticleSource for SearchApiSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    /// The API filters by `keyword` server-side, so every returned item is kept.
    async fn fetch(&self, topic: &Topic, keyword: &str) -> Vec<CandidateArticle> {
        self.search_or_empty(topic, keyword).await
    }

    /// Searches by topic name, then keeps items where any keyword appears
    /// verbatim in the title or summary.
    async fn fetch_any(&self, topic: &Topic, keywords: &[String]) -> Vec<CandidateArticle> {
        self.search_or_empty(topic, &topic.name)
            .await
            .into_iter()
            .filter(|c| contains_any_keyword(keywords, &c.title, &c.summary))
            .collect()
    }
}
