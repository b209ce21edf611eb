//! Database initialization
//!
//! Creates the database file and every table on first run. All statements
//! are idempotent, so opening an existing database is the same call.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (or create) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL lets readers proceed while one writer holds the lock
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_cafes_table(&pool).await?;
    create_reviews_table(&pool).await?;
    create_review_images_table(&pool).await?;
    create_orphan_file_history_table(&pool).await?;

    Ok(pool)
}

async fn create_cafes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cafes (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            coffee_total INTEGER NOT NULL DEFAULT 0,
            space_total INTEGER NOT NULL DEFAULT 0,
            price_total INTEGER NOT NULL DEFAULT 0,
            noise_total INTEGER NOT NULL DEFAULT 0,
            dominant_type TEXT NOT NULL DEFAULT 'NONE',
            theme_normal INTEGER NOT NULL DEFAULT 0,
            theme_vibe INTEGER NOT NULL DEFAULT 0,
            theme_view INTEGER NOT NULL DEFAULT 0,
            theme_pet INTEGER NOT NULL DEFAULT 0,
            theme_hobby INTEGER NOT NULL DEFAULT 0,
            theme_study INTEGER NOT NULL DEFAULT 0,
            theme_kids INTEGER NOT NULL DEFAULT 0,
            theme_etc INTEGER NOT NULL DEFAULT 0,
            current_theme TEXT,
            version INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            guid TEXT PRIMARY KEY,
            cafe_guid TEXT NOT NULL REFERENCES cafes(guid),
            member_guid TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            coffee INTEGER NOT NULL CHECK (coffee BETWEEN 1 AND 5),
            space INTEGER NOT NULL CHECK (space BETWEEN 1 AND 5),
            price INTEGER NOT NULL CHECK (price BETWEEN 1 AND 5),
            noise INTEGER NOT NULL CHECK (noise BETWEEN 1 AND 5),
            theme TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_cafe ON reviews(cafe_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_review_images_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review_images (
            guid TEXT PRIMARY KEY,
            review_guid TEXT NOT NULL REFERENCES reviews(guid) ON DELETE CASCADE,
            url TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (review_guid, url)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_orphan_file_history_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS storage_orphan_file_history (
            guid TEXT PRIMARY KEY,
            file_name TEXT NOT NULL,
            file_type TEXT NOT NULL,
            domain TEXT NOT NULL,
            url TEXT NOT NULL,
            is_hard_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one live record per URL; hard-deleted rows may repeat
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_orphan_live_url
        ON storage_orphan_file_history(url)
        WHERE is_hard_deleted = 0
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
