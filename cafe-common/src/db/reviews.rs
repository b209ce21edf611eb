//! Review persistence
//!
//! Creating a review is one transaction: the review row, its image rows and
//! the cafe aggregate update commit together or not at all. Both rule checks
//! (index range, image cap) run before the transaction opens.

use super::cafes::fold_review;
use super::models::{Cafe, Review, ReviewImage};
use super::retry::retry_on_conflict;
use crate::rules::{build_review_images, validate_index_range, NewReviewImage, ReviewIndex};
use crate::types::CafeTheme;
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;
use uuid::Uuid;

const REVIEW_COLUMNS: &str =
    "guid, cafe_guid, member_guid, content, coffee, space, price, noise, theme, created_at, updated_at";

/// Review submission as received from a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub cafe_id: Uuid,
    pub member_id: Uuid,
    #[serde(default)]
    pub content: String,
    pub index: ReviewIndex,
    #[serde(default)]
    pub theme: Option<CafeTheme>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Everything written by [`create_review`]
#[derive(Debug, Clone, Serialize)]
pub struct CreatedReview {
    pub review: Review,
    pub images: Vec<ReviewImage>,
    pub cafe: Cafe,
}

/// Validate and persist a review, its images and the cafe aggregate update
pub async fn create_review(
    pool: &SqlitePool,
    new_review: &NewReview,
    max_wait_ms: u64,
) -> Result<CreatedReview> {
    validate_index_range(&new_review.index)?;

    let review_id = Uuid::new_v4();
    let images = build_review_images(review_id, &new_review.image_urls)?;

    let images = &images;
    let created = retry_on_conflict("create review", max_wait_ms, move || async move {
        let mut tx = pool.begin().await?;
        let review = insert_review(&mut *tx, review_id, new_review).await?;
        let images = insert_images(&mut *tx, images).await?;
        let cafe = fold_review(&mut *tx, new_review.cafe_id, &new_review.index, new_review.theme).await?;
        tx.commit().await?;
        Ok::<_, Error>(CreatedReview {
            review,
            images,
            cafe,
        })
    })
    .await?;

    info!(
        review_id = %review_id,
        cafe_id = %new_review.cafe_id,
        images = created.images.len(),
        dominant_type = created.cafe.types.dominant_type.as_str(),
        "Created review"
    );

    Ok(created)
}

async fn insert_review(
    conn: &mut SqliteConnection,
    review_id: Uuid,
    new_review: &NewReview,
) -> Result<Review> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO reviews (guid, cafe_guid, member_guid, content, coffee, space, price, noise, theme, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(review_id.to_string())
    .bind(new_review.cafe_id.to_string())
    .bind(new_review.member_id.to_string())
    .bind(&new_review.content)
    .bind(new_review.index.coffee)
    .bind(new_review.index.space)
    .bind(new_review.index.price)
    .bind(new_review.index.noise)
    .bind(new_review.theme.map(|t| t.as_str()))
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() {
                return Error::NotFound(format!("Cafe {}", new_review.cafe_id));
            }
        }
        Error::Database(e)
    })?;

    fetch_review(conn, review_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Review {} vanished after insert", review_id)))
}

async fn insert_images(
    conn: &mut SqliteConnection,
    images: &[NewReviewImage],
) -> Result<Vec<ReviewImage>> {
    let now = Utc::now().to_rfc3339();
    let mut stored = Vec::with_capacity(images.len());

    for image in images {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO review_images (guid, review_guid, url, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(image.review_id.to_string())
        .bind(&image.url)
        .bind(&now)
        .execute(&mut *conn)
        .await?;

        stored.push(ReviewImage {
            id,
            review_id: image.review_id,
            url: image.url.clone(),
        });
    }

    Ok(stored)
}

/// Replace a review's index tuple after re-validating it
///
/// Cafe totals are not retracted or re-applied; they only ever grow from
/// review creation.
pub async fn update_review_index(
    pool: &SqlitePool,
    review_id: Uuid,
    index: ReviewIndex,
) -> Result<Review> {
    validate_index_range(&index)?;

    let result = sqlx::query(
        r#"
        UPDATE reviews SET coffee = ?, space = ?, price = ?, noise = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(index.coffee)
    .bind(index.space)
    .bind(index.price)
    .bind(index.noise)
    .bind(Utc::now().to_rfc3339())
    .bind(review_id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Review {}", review_id)));
    }

    info!(review_id = %review_id, "Updated review index");

    load_review(pool, review_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Review {}", review_id)))
}

/// Load a review by id
pub async fn load_review(pool: &SqlitePool, id: Uuid) -> Result<Option<Review>> {
    let mut conn = pool.acquire().await?;
    fetch_review(&mut conn, id).await
}

async fn fetch_review(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Review>> {
    let sql = format!("SELECT {} FROM reviews WHERE guid = ?", REVIEW_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(Review::from_row).transpose()
}

/// Images attached to a review
pub async fn load_review_images(pool: &SqlitePool, review_id: Uuid) -> Result<Vec<ReviewImage>> {
    let rows = sqlx::query(
        "SELECT guid, review_guid, url FROM review_images WHERE review_guid = ? ORDER BY rowid",
    )
    .bind(review_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(ReviewImage::from_row).collect()
}
