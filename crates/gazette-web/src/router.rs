//! Axum router — maps URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    backup::{backup_date, restore_range},
    collect::{collect_all, collect_topic},
    health::health,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/health",            get(health))
        .route("/api/collect",           post(collect_all))
        .route("/api/collect/{topic_id}", post(collect_topic))
        .route("/api/backup/{date}",     post(backup_date))
        .route("/api/restore",           post(restore_range))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
