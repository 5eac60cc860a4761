use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sources: Vec<String>,
    pub uptime_secs: i64,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sources: state.collector.source_names(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}
