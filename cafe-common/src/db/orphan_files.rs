//! Storage orphan-file history
//!
//! The recorded-URL lookup and the inserts share one transaction, and a
//! partial unique index on live URLs catches a concurrent batch that slipped
//! past the lookup. Either way the caller sees `DuplicateOrphanFile`.

use super::models::OrphanFileHistory;
use super::retry::retry_on_conflict;
use crate::error::RuleViolation;
use crate::rules::{validate_and_build_orphan_batch, NewOrphanFileHistory, MAX_ORPHAN_BATCH};
use crate::{Error, Result};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

const HISTORY_COLUMNS: &str = "guid, file_name, file_type, domain, url, is_hard_deleted, created_at";

/// Validate a reported batch and record it as a single unit
///
/// The lookup and inserts run in a deferred transaction. A writer that loses
/// the upgrade to SQLite's write lock retries the whole cycle, so a late
/// racer re-reads the recorded URLs and reports `DuplicateOrphanFile`.
pub async fn record_orphan_batch(
    pool: &SqlitePool,
    file_names: &[String],
    file_types: &[String],
    domains: &[String],
    urls: &[String],
    max_wait_ms: u64,
) -> Result<Vec<OrphanFileHistory>> {
    let stored = retry_on_conflict("record orphan batch", max_wait_ms, move || async move {
        let mut tx = pool.begin().await?;

        // Oversized batches fail validation before the lookup is consulted
        let recorded = if urls.len() <= MAX_ORPHAN_BATCH {
            fetch_recorded_urls(&mut *tx, urls).await?
        } else {
            HashSet::new()
        };

        let batch =
            validate_and_build_orphan_batch(file_names, file_types, domains, urls, &recorded)
                .map_err(|violation| {
                    warn!(files = urls.len(), %violation, "Rejected orphan file batch");
                    violation
                })?;

        let mut stored = Vec::with_capacity(batch.len());
        for entry in &batch {
            stored.push(insert_history(&mut *tx, entry).await?);
        }
        tx.commit().await?;
        Ok::<_, Error>(stored)
    })
    .await?;

    info!(files = stored.len(), "Recorded orphan file batch");
    Ok(stored)
}

async fn insert_history(
    conn: &mut SqliteConnection,
    entry: &NewOrphanFileHistory,
) -> Result<OrphanFileHistory> {
    let record = OrphanFileHistory {
        id: Uuid::new_v4(),
        file_name: entry.file_name.clone(),
        file_type: entry.file_type,
        domain: entry.domain,
        url: entry.url.clone(),
        is_hard_deleted: entry.is_hard_deleted,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO storage_orphan_file_history (guid, file_name, file_type, domain, url, is_hard_deleted, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.file_name)
    .bind(record.file_type.as_str())
    .bind(record.domain.as_str())
    .bind(&record.url)
    .bind(record.is_hard_deleted)
    .bind(record.created_at.to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Error::Rule(RuleViolation::DuplicateOrphanFile {
                    url: entry.url.clone(),
                });
            }
        }
        Error::Database(e)
    })?;

    Ok(record)
}

/// URLs among `urls` that already have a live history record
pub async fn find_recorded_urls(pool: &SqlitePool, urls: &[String]) -> Result<HashSet<String>> {
    let mut conn = pool.acquire().await?;
    fetch_recorded_urls(&mut conn, urls).await
}

async fn fetch_recorded_urls(
    conn: &mut SqliteConnection,
    urls: &[String],
) -> Result<HashSet<String>> {
    if urls.is_empty() {
        return Ok(HashSet::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT url FROM storage_orphan_file_history WHERE is_hard_deleted = 0 AND url IN (",
    );
    let mut separated = builder.separated(", ");
    for url in urls {
        separated.push_bind(url.clone());
    }
    separated.push_unseparated(")");

    let rows: Vec<(String,)> = builder.build_query_as().fetch_all(&mut *conn).await?;
    Ok(rows.into_iter().map(|(url,)| url).collect())
}

/// Flag a record once its physical file has been removed from storage
///
/// Frees the URL for a later batch to record again.
pub async fn mark_hard_deleted(pool: &SqlitePool, id: Uuid) -> Result<OrphanFileHistory> {
    let result = sqlx::query("UPDATE storage_orphan_file_history SET is_hard_deleted = 1 WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Orphan file {}", id)));
    }

    info!(orphan_file_id = %id, "Marked orphan file hard-deleted");

    load_orphan_file(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Orphan file {}", id)))
}

pub async fn load_orphan_file(pool: &SqlitePool, id: Uuid) -> Result<Option<OrphanFileHistory>> {
    let sql = format!(
        "SELECT {} FROM storage_orphan_file_history WHERE guid = ?",
        HISTORY_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(OrphanFileHistory::from_row).transpose()
}

/// Records whose files still await physical deletion, oldest first
pub async fn list_live_orphan_files(pool: &SqlitePool) -> Result<Vec<OrphanFileHistory>> {
    let sql = format!(
        "SELECT {} FROM storage_orphan_file_history WHERE is_hard_deleted = 0 ORDER BY created_at, rowid",
        HISTORY_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    rows.iter().map(OrphanFileHistory::from_row).collect()
}
