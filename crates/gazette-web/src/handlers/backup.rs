//! Backup and restore triggers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use gazette_common::RestoreResult;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RestoreParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub async fn backup_date(
    State(state): State<SharedState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<BackupResponse>, ApiError> {
    let count = state.backup.backup_by_date(date).await?;
    Ok(Json(BackupResponse { date, count }))
}

pub async fn restore_range(
    State(state): State<SharedState>,
    Query(params): Query<RestoreParams>,
) -> Result<Json<Vec<RestoreResult>>, ApiError> {
    let results = state.restore.restore_range(params.from, params.to).await?;
    Ok(Json(results))
}
