//! Generic RSS 2.0 feed client.
//!
//! One routine serves every configured feed; feeds differ only in the
//! `RssSourceConfig` row (name, URL, date format). Parsing is tolerant of
//! sloppy markup: mismatched end tags are ignored, unknown entities are kept
//! verbatim, and a parse error keeps whatever items were read before it.

use anyhow::anyhow;
use async_trait::async_trait;
use gazette_common::{CandidateArticle, FetchClient, Topic};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use super::ArticleSource;
use crate::dedup::{matches_any_keyword, matches_keyword};
use crate::models::RssSourceConfig;

/// Raw `<item>` fields, each optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
}

impl FeedItem {
    /// Trim every field, dropping those left empty.
    fn trimmed(self) -> Self {
        let trim = |v: Option<String>| v.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        Self {
            title: trim(self.title),
            link: trim(self.link),
            description: trim(self.description),
            pub_date: trim(self.pub_date),
        }
    }
}

pub struct RssSource {
    client: FetchClient,
    config: RssSourceConfig,
}

impl RssSource {
    pub fn new(client: FetchClient, config: RssSourceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RssSourceConfig {
        &self.config
    }

    #[instrument(skip(self), fields(source = %self.config.name))]
    async fn fetch_items(&self) -> anyhow::Result<Vec<FeedItem>> {
        let resp = self.client.get(&self.config.feed_url)?.send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {} from {}", status, self.config.feed_url));
        }

        let body = resp.text().await?;
        let items = parse_feed_items(&body);
        debug!(count = items.len(), "RSS feed parsed");
        Ok(items)
    }

    async fn fetch_filtered<F>(&self, topic: &Topic, keep: F) -> Vec<CandidateArticle>
    where
        F: Fn(&str, &str) -> bool + Send,
    {
        let items = match self.fetch_items().await {
            Ok(items) => items,
            Err(e) => {
                warn!(source = %self.config.name, topic = %topic.name, error = %e, "RSS fetch failed");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter(|item| {
                keep(
                    item.title.as_deref().unwrap_or(""),
                    item.description.as_deref().unwrap_or(""),
                )
            })
            .filter_map(|item| self.to_candidate(item))
            .collect()
    }

    fn to_candidate(&self, item: FeedItem) -> Option<CandidateArticle> {
        let link = item.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        let Some(link) = link else {
            debug!(source = %self.config.name, title = ?item.title, "Skipping item without link");
            return None;
        };

        Some(CandidateArticle {
            topic_id: None,
            source: self.config.name.clone(),
            original_link: link,
            title: item.title.unwrap_or_default().trim().to_string(),
            summary: item.description.unwrap_or_default(),
            published_at: self.config.date_format.parse_or_now(item.pub_date.as_deref()),
        })
    }
}

#[async_trait]
impl ArticleSource for RssSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(&self, topic: &Topic, keyword: &str) -> Vec<CandidateArticle> {
        self.fetch_filtered(topic, |title, desc| matches_keyword(keyword, title, desc))
            .await
    }

    async fn fetch_any(&self, topic: &Topic, keywords: &[String]) -> Vec<CandidateArticle> {
        self.fetch_filtered(topic, |title, desc| matches_any_keyword(keywords, title, desc))
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
}

fn field_for(name: &[u8]) -> Option<Field> {
    match name {
        b"title" => Some(Field::Title),
        b"link" => Some(Field::Link),
        b"description" => Some(Field::Description),
        b"pubDate" | b"dc:date" => Some(Field::PubDate),
        _ => None,
    }
}

fn slot(item: &mut FeedItem, field: Field) -> &mut Option<String> {
    match field {
        Field::Title => &mut item.title,
        Field::Link => &mut item.link,
        Field::Description => &mut item.description,
        Field::PubDate => &mut item.pub_date,
    }
}

/// Select every `<item>` in a feed document and pull out its fields.
pub fn parse_feed_items(xml: &str) -> Vec<FeedItem> {
    let mut items = Vec::new();
    let mut reader = Reader::from_str(xml);
    // Text is kept verbatim so words around inline markup stay separated;
    // each field is trimmed once when its item closes.
    reader.config_mut().check_end_names = false;

    let mut current: Option<FeedItem> = None;
    let mut field: Option<Field> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"item" => {
                    current = Some(FeedItem::default());
                    field = None;
                }
                name => {
                    // Markup nested inside a field (e.g. raw <p> in a
                    // description) keeps feeding the enclosing field.
                    if current.is_some() && field.is_none() {
                        field = field_for(name);
                    }
                }
            },
            Ok(Event::Empty(ref e)) => {
                // Atom-style <link href="..."/>
                if e.name().as_ref() == b"link" {
                    if let Some(ref mut item) = current {
                        if item.link.is_none() {
                            if let Ok(Some(href)) = e.try_get_attribute("href") {
                                item.link = href.unescape_value().ok().map(|v| v.into_owned());
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    let text = e
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned());
                    slot(item, f).get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    let text = String::from_utf8_lossy(e).into_owned();
                    slot(item, f).get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item.trimmed());
                    }
                    field = None;
                }
                name => {
                    if field.is_some() && field == field_for(name) {
                        field = None;
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Feed parse error at byte {}: {}", reader.buffer_position(), e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    items
}
