//! Cafe endpoints

use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cafe_common::db::{self, Cafe};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCafeRequest {
    pub name: String,
}

/// POST /api/cafes
pub async fn create_cafe(
    State(state): State<AppState>,
    Json(payload): Json<CreateCafeRequest>,
) -> ApiResult<(StatusCode, Json<Cafe>)> {
    let cafe = db::create_cafe(&state.db, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(cafe)))
}

/// GET /api/cafes/:id
pub async fn get_cafe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Cafe>> {
    db::load_cafe(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Cafe {}", id)))
}

pub fn cafe_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cafes", post(create_cafe))
        .route("/api/cafes/:id", get(get_cafe))
}
