//! Review endpoints
//!
//! Themes arrive as free text and resolve leniently: anything unrecognized
//! is counted as `ETC`.

use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use cafe_common::db::{self, CreatedReview, NewReview, Review, ReviewImage};
use cafe_common::rules::ReviewIndex;
use cafe_common::CafeTheme;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub cafe_id: Uuid,
    pub member_id: Uuid,
    #[serde(default)]
    pub content: String,
    pub index: ReviewIndex,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(req: CreateReviewRequest) -> Self {
        NewReview {
            cafe_id: req.cafe_id,
            member_id: req.member_id,
            content: req.content,
            index: req.index,
            theme: req.theme.as_deref().map(CafeTheme::from_alias),
            image_urls: req.image_urls,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewWithImages {
    pub review: Review,
    pub images: Vec<ReviewImage>,
}

/// POST /api/reviews
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<CreatedReview>)> {
    let new_review = NewReview::from(payload);
    let created = db::create_review(&state.db, &new_review, state.max_lock_wait_ms).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/reviews/:id
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReviewWithImages>> {
    let review = db::load_review(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Review {}", id)))?;
    let images = db::load_review_images(&state.db, id).await?;

    Ok(Json(ReviewWithImages { review, images }))
}

/// PUT /api/reviews/:id/index
pub async fn update_review_index(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(index): Json<ReviewIndex>,
) -> ApiResult<Json<Review>> {
    let review = db::update_review_index(&state.db, id, index).await?;
    Ok(Json(review))
}

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route("/api/reviews/:id", get(get_review))
        .route("/api/reviews/:id/index", put(update_review_index))
}
