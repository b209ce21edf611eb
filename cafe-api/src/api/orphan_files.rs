//! Orphan-file reconciliation endpoints

use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use cafe_common::db::{self, OrphanFileHistory};
use serde::Deserialize;
use uuid::Uuid;

/// Batch of orphan files as four parallel lists
#[derive(Debug, Deserialize)]
pub struct OrphanFileBatchRequest {
    pub file_names: Vec<String>,
    pub file_types: Vec<String>,
    pub domains: Vec<String>,
    pub urls: Vec<String>,
}

/// POST /api/orphan-files
pub async fn record_orphan_files(
    State(state): State<AppState>,
    Json(batch): Json<OrphanFileBatchRequest>,
) -> ApiResult<(StatusCode, Json<Vec<OrphanFileHistory>>)> {
    let records = db::record_orphan_batch(
        &state.db,
        &batch.file_names,
        &batch.file_types,
        &batch.domains,
        &batch.urls,
        state.max_lock_wait_ms,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(records)))
}

/// GET /api/orphan-files
pub async fn list_orphan_files(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<OrphanFileHistory>>> {
    Ok(Json(db::list_live_orphan_files(&state.db).await?))
}

/// POST /api/orphan-files/:id/hard-delete
pub async fn mark_hard_deleted(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrphanFileHistory>> {
    Ok(Json(db::mark_hard_deleted(&state.db, id).await?))
}

pub fn orphan_file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/orphan-files",
            post(record_orphan_files).get(list_orphan_files),
        )
        .route("/api/orphan-files/:id/hard-delete", post(mark_hard_deleted))
}
