//! Collection run triggers.

use axum::{
    extract::{Path, State},
    Json,
};
use gazette_ingestion::CollectSummary;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::SharedState;

/// Run a full collection pass and return its summary. Source failures show
/// up in the summary, never as an error status.
pub async fn collect_all(State(state): State<SharedState>) -> Json<CollectSummary> {
    Json(state.collector.collect_articles().await)
}

pub async fn collect_topic(
    State(state): State<SharedState>,
    Path(topic_id): Path<Uuid>,
) -> Result<Json<CollectSummary>, ApiError> {
    let summary = state.collector.collect_topic_by_id(topic_id).await?;
    Ok(Json(summary))
}
