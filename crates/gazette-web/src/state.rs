//! Shared application state for the web server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gazette_backup::{BackupService, RestoreService};
use gazette_ingestion::ArticleCollector;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<ArticleCollector>,
    pub backup: BackupService,
    pub restore: RestoreService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(collector: Arc<ArticleCollector>, backup: BackupService, restore: RestoreService) -> Self {
        Self { collector, backup, restore, started_at: Utc::now() }
    }
}

pub type SharedState = Arc<AppState>;
