//! Configuration loading for Gazette.
//! Reads gazette.toml from the current directory or the path in GAZETTE_CONFIG.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gazette_ingestion::models::{RssSourceConfig, SearchApiConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub topics: Vec<TopicSeed>,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64    { 10 }
fn default_user_agent()   -> String { gazette_common::http::DEFAULT_USER_AGENT.to_string() }

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: default_user_agent() }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_collect_interval")]
    pub collect_interval_secs: u64,
    #[serde(default = "default_backup_interval")]
    pub backup_interval_secs: u64,
    #[serde(default = "default_max_fetches")]
    pub max_concurrent_fetches: usize,
    #[serde(default = "default_max_topics")]
    pub max_concurrent_topics: usize,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_collect_interval() -> u64   { 3600 }
fn default_backup_interval()  -> u64   { 86_400 }
fn default_max_fetches()      -> usize { 4 }
fn default_max_topics()       -> usize { 2 }
fn default_fetch_timeout()    -> u64   { 60 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            collect_interval_secs: default_collect_interval(),
            backup_interval_secs: default_backup_interval(),
            max_concurrent_fetches: default_max_fetches(),
            max_concurrent_topics: default_max_topics(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub rss: Vec<RssSourceConfig>,
    pub search_api: Option<SearchApiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

fn default_snapshot_dir() -> PathBuf { PathBuf::from("./snapshots") }

impl Default for BackupConfig {
    fn default() -> Self {
        Self { snapshot_dir: default_snapshot_dir() }
    }
}

/// Topic loaded into the in-memory topic store at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicSeed {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "0.0.0.0:3000".to_string() }

impl Default for WebConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Config {
    /// Load configuration from gazette.toml.
    /// Checks GAZETTE_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("GAZETTE_CONFIG")
            .unwrap_or_else(|_| "gazette.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy gazette.example.toml to gazette.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Job intervals feed `tokio::time::interval`, which rejects zero.
    fn validate(&self) -> anyhow::Result<()> {
        let intervals = [
            ("scheduler.collect_interval_secs", self.scheduler.collect_interval_secs),
            ("scheduler.backup_interval_secs", self.scheduler.backup_interval_secs),
            ("scheduler.fetch_timeout_secs", self.scheduler.fetch_timeout_secs),
        ];
        for (key, secs) in intervals {
            if secs == 0 {
                anyhow::bail!("{} must be greater than zero", key);
            }
        }
        Ok(())
    }

    /// Environment overrides: search API credentials and the bind address.
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api) = self.sources.search_api.as_mut() {
            if let Some(id) = get("GAZETTE_SEARCH_CLIENT_ID") {
                api.client_id = id;
            }
            if let Some(secret) = get("GAZETTE_SEARCH_CLIENT_SECRET") {
                api.client_secret = secret;
            }
        }
        if let Some(bind) = get("GAZETTE_BIND") {
            self.web.bind = bind;
        }
    }
}
