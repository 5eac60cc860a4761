//! Source configuration models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the RSS source table: every feed goes through the same
/// fetch routine and differs only in these fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RssSourceConfig {
    pub name: String,
    pub feed_url: String,
    #[serde(default)]
    pub date_format: DateFormat,
}

/// Keyed search API settings. Credentials are injected here at
/// construction; the source never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchApiConfig {
    #[serde(default = "default_api_name")]
    pub name: String,
    pub endpoint: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_id_header")]
    pub id_header: String,
    #[serde(default = "default_secret_header")]
    pub secret_header: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_api_name()      -> String { "naver".to_string() }
fn default_id_header()     -> String { "X-Naver-Client-Id".to_string() }
fn default_secret_header() -> String { "X-Naver-Client-Secret".to_string() }
fn default_page_size()     -> u32    { 50 }
fn default_sort()          -> String { "date".to_string() }

/// How a source writes its publish dates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFormat {
    /// `Tue, 15 Jul 2025 09:30:00 +0900` (RSS 2.0)
    #[default]
    Rfc2822,
    /// `2025-07-15T09:30:00+09:00` (Atom, most JSON APIs)
    Rfc3339,
    /// A chrono format string, e.g. `%Y-%m-%d %H:%M:%S`. Values without an
    /// offset are read as UTC.
    Custom(String),
}

impl From<String> for DateFormat {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "rfc2822" | "rfc822" => DateFormat::Rfc2822,
            "rfc3339" | "iso8601" => DateFormat::Rfc3339,
            _ => DateFormat::Custom(s),
        }
    }
}

impl From<DateFormat> for String {
    fn from(f: DateFormat) -> Self {
        match f {
            DateFormat::Rfc2822 => "rfc2822".to_string(),
            DateFormat::Rfc3339 => "rfc3339".to_string(),
            DateFormat::Custom(fmt) => fmt,
        }
    }
}

impl DateFormat {
    pub fn parse(&self, text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        match self {
            DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(text)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            DateFormat::Custom(fmt) => DateTime::parse_from_str(text, fmt)
                .map(|d| d.with_timezone(&Utc))
                .or_else(|_| NaiveDateTime::parse_from_str(text, fmt).map(|n| n.and_utc()))
                .ok(),
        }
    }

    /// Parse, substituting the current time when the text is missing or
    /// unparsable. An article is never dropped for its date alone.
    pub fn parse_or_now(&self, text: Option<&str>) -> DateTime<Utc> {
        match text {
            Some(t) => self.parse(t).unwrap_or_else(|| {
                tracing::debug!(date = t, format = ?self, "Unparsable publish date, using current time");
                Utc::now()
            }),
            None => Utc::now(),
        }
    }
}
