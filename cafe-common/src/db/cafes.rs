//! Cafe persistence and aggregate updates
//!
//! Aggregates are written with compare-and-swap on `version`: the update
//! only lands if nobody else wrote the row since it was read. Callers run
//! the read-apply-write cycle inside [`retry_on_conflict`].

use super::models::{theme_column, Cafe};
use super::retry::retry_on_conflict;
use crate::rules::ReviewIndex;
use crate::types::{CafeTheme, CafeType};
use crate::{Error, Result};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

const CAFE_COLUMNS: &str = "guid, name, coffee_total, space_total, price_total, noise_total, \
     dominant_type, theme_normal, theme_vibe, theme_view, theme_pet, theme_hobby, theme_study, \
     theme_kids, theme_etc, current_theme, version, created_at, updated_at";

/// Insert a new cafe with zeroed aggregates
pub async fn create_cafe(pool: &SqlitePool, name: &str) -> Result<Cafe> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Cafe name cannot be empty".to_string()));
    }

    let id = Uuid::new_v4();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO cafes (guid, name, dominant_type, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(name)
    .bind(CafeType::None.as_str())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    info!(cafe_id = %id, cafe_name = name, "Created cafe");

    load_cafe(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Cafe {} vanished after insert", id)))
}

/// Load a cafe by id
pub async fn load_cafe(pool: &SqlitePool, id: Uuid) -> Result<Option<Cafe>> {
    let mut conn = pool.acquire().await?;
    fetch_cafe(&mut conn, id).await
}

pub(crate) async fn fetch_cafe(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Cafe>> {
    let sql = format!("SELECT {} FROM cafes WHERE guid = ?", CAFE_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(Cafe::from_row).transpose()
}

/// Write `cafe`'s aggregates if its version is still current
///
/// Returns the stored cafe with the bumped version, or
/// [`Error::VersionConflict`] when another writer got there first.
pub(crate) async fn store_aggregates(conn: &mut SqliteConnection, cafe: &Cafe) -> Result<Cafe> {
    let theme_assignments: Vec<String> = CafeTheme::ALL
        .iter()
        .map(|theme| format!("{} = ?", theme_column(*theme)))
        .collect();
    let sql = format!(
        r#"
        UPDATE cafes SET
            coffee_total = ?, space_total = ?, price_total = ?, noise_total = ?,
            dominant_type = ?, {}, current_theme = ?,
            version = version + 1, updated_at = ?
        WHERE guid = ? AND version = ?
        "#,
        theme_assignments.join(", ")
    );

    let mut query = sqlx::query(&sql)
        .bind(cafe.types.coffee_total)
        .bind(cafe.types.space_total)
        .bind(cafe.types.price_total)
        .bind(cafe.types.noise_total)
        .bind(cafe.types.dominant_type.as_str());
    for theme in CafeTheme::ALL {
        query = query.bind(cafe.themes.count(theme));
    }
    let result = query
        .bind(cafe.themes.current_theme.map(|t| t.as_str()))
        .bind(Utc::now().to_rfc3339())
        .bind(cafe.id.to_string())
        .bind(cafe.version)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return match fetch_cafe(conn, cafe.id).await? {
            Some(_) => Err(Error::VersionConflict {
                entity: "cafe",
                id: cafe.id.to_string(),
            }),
            None => Err(Error::NotFound(format!("Cafe {}", cafe.id))),
        };
    }

    fetch_cafe(conn, cafe.id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Cafe {}", cafe.id)))
}

/// Fold one accepted review into a cafe on an open connection/transaction
///
/// `index` must already have passed range validation.
pub(crate) async fn fold_review(
    conn: &mut SqliteConnection,
    cafe_id: Uuid,
    index: &ReviewIndex,
    theme: Option<CafeTheme>,
) -> Result<Cafe> {
    let mut cafe = fetch_cafe(conn, cafe_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Cafe {}", cafe_id)))?;

    let previous = cafe.types.dominant_type;
    cafe.types = cafe.types.apply_review(index);
    if let Some(theme) = theme {
        cafe.themes = cafe.themes.record(theme);
    }

    let stored = store_aggregates(conn, &cafe).await?;

    if stored.types.dominant_type != previous {
        info!(
            cafe_id = %cafe_id,
            from = previous.as_str(),
            to = stored.types.dominant_type.as_str(),
            "Cafe dominant type changed"
        );
    } else {
        debug!(cafe_id = %cafe_id, version = stored.version, "Cafe aggregates updated");
    }

    Ok(stored)
}

/// Apply a validated review index (and optional theme) to a cafe
///
/// Runs in its own transaction, retried on version conflicts for up to
/// `max_wait_ms`.
pub async fn apply_review_to_cafe(
    pool: &SqlitePool,
    cafe_id: Uuid,
    index: ReviewIndex,
    theme: Option<CafeTheme>,
    max_wait_ms: u64,
) -> Result<Cafe> {
    crate::rules::validate_index_range(&index)?;

    retry_on_conflict("apply review to cafe", max_wait_ms, move || async move {
        let mut tx = pool.begin().await?;
        let cafe = fold_review(&mut *tx, cafe_id, &index, theme).await?;
        tx.commit().await?;
        Ok::<_, Error>(cafe)
    })
    .await
}
