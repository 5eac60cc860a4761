use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::GazetteError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("gazette/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by every article source.
///
/// Every request carries the client-wide timeout, so a hung feed cannot stall
/// a collection run. When the allowlist is non-empty, requests are limited to
/// the listed hosts (and their subdomains).
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl FetchClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, GazetteError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GazetteError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist: HashSet::new() })
    }

    /// Client with the default timeout and user agent.
    pub fn with_defaults() -> Result<Self, GazetteError> {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allows the host of `url`, e.g. a configured feed URL.
    pub fn allow_url(&mut self, url: &str) -> Result<(), GazetteError> {
        let parsed = Url::parse(url)
            .map_err(|e| GazetteError::Config(format!("Invalid URL {}: {}", url, e)))?;
        match parsed.host_str() {
            Some(host) => {
                self.allow_domain(host);
                Ok(())
            }
            None => Err(GazetteError::Config(format!("URL has no host: {}", url))),
        }
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        if self.allowlist.is_empty() {
            return true;
        }
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, GazetteError> {
        if !self.is_allowed(url) {
            return Err(GazetteError::Security(format!(
                "Host not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allowlist_permits_any_host() {
        let client = FetchClient::with_defaults().unwrap();
        assert!(client.is_allowed("https://www.hankyung.com/feed/it"));
        assert!(!client.is_allowed("not a url"));
    }

    #[test]
    fn test_allowlist_matches_subdomains() {
        let mut client = FetchClient::with_defaults().unwrap();
        client.allow_domain("hankyung.com");
        assert!(client.is_allowed("https://www.hankyung.com/feed/it"));
        assert!(client.is_allowed("https://hankyung.com/feed/it"));
        assert!(!client.is_allowed("https://evil-hankyung.com/feed"));
        assert!(client.get("https://example.org/").is_err());
    }

    #[test]
    fn test_allow_url_rejects_hostless_url() {
        let mut client = FetchClient::with_defaults().unwrap();
        assert!(client.allow_url("https://openapi.naver.com/v1/search/news.json").is_ok());
        assert!(client.allow_url("mailto:someone").is_err());
    }
}
