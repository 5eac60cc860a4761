//! Article source clients.

pub mod rss;
pub mod search_api;

use async_trait::async_trait;
use gazette_common::{CandidateArticle, Topic};
use lazy_static::lazy_static;
use regex::Regex;

pub use rss::RssSource;
pub use search_api::SearchApiSource;

/// Common interface for all article sources.
///
/// Neither method fails: network errors, non-2xx responses and unreadable
/// bodies are logged by the source and yield an empty list, so one broken
/// feed never aborts a collection run.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Source name stamped on every candidate (e.g. "hankyung").
    fn name(&self) -> &str;

    /// Fetch candidates for `topic` matching a single keyword.
    async fn fetch(&self, topic: &Topic, keyword: &str) -> Vec<CandidateArticle>;

    /// Fetch candidates for `topic` matching any of `keywords`.
    ///
    /// For callers holding a topic's full keyword set; a collection run
    /// queries by topic name through `fetch` instead.
    async fn fetch_any(&self, topic: &Topic, keywords: &[String]) -> Vec<CandidateArticle>;
}

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Strip inline markup (search APIs wrap hits in `<b>`) and decode the
/// handful of entities those APIs emit.
pub fn clean_markup(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, "");
    stripped
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
