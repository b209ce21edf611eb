//! Database models

use crate::rules::{CafeThemeAggregate, CafeTypeAggregate, ReviewIndex};
use crate::types::{CafeTheme, CafeType, FileDomain, FileType};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Cafe record with its versioned aggregates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cafe {
    pub id: Uuid,
    pub name: String,
    pub types: CafeTypeAggregate,
    pub themes: CafeThemeAggregate,
    /// Incremented on every aggregate write; guards compare-and-swap updates
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub cafe_id: Uuid,
    pub member_id: Uuid,
    pub content: String,
    pub index: ReviewIndex,
    pub theme: Option<CafeTheme>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewImage {
    pub id: Uuid,
    pub review_id: Uuid,
    pub url: String,
}

/// Persisted orphan-file report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanFileHistory {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: FileType,
    pub domain: FileDomain,
    pub url: String,
    pub is_hard_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Column holding the occurrence count for `theme`
pub(crate) fn theme_column(theme: CafeTheme) -> &'static str {
    match theme {
        CafeTheme::Normal => "theme_normal",
        CafeTheme::Vibe => "theme_vibe",
        CafeTheme::View => "theme_view",
        CafeTheme::Pet => "theme_pet",
        CafeTheme::Hobby => "theme_hobby",
        CafeTheme::Study => "theme_study",
        CafeTheme::Kids => "theme_kids",
        CafeTheme::Etc => "theme_etc",
    }
}

pub(crate) fn parse_guid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("Invalid UUID in database: {}", e)))
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid timestamp in database: {}", e)))
}

impl Cafe {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let mut counts = [0i64; 8];
        for theme in CafeTheme::ALL {
            counts[theme.ordinal()] = row.try_get(theme_column(theme))?;
        }
        let current_theme: Option<String> = row.try_get("current_theme")?;
        let dominant_type: String = row.try_get("dominant_type")?;

        Ok(Self {
            id: parse_guid(row.try_get("guid")?)?,
            name: row.try_get("name")?,
            types: CafeTypeAggregate {
                coffee_total: row.try_get("coffee_total")?,
                space_total: row.try_get("space_total")?,
                price_total: row.try_get("price_total")?,
                noise_total: row.try_get("noise_total")?,
                dominant_type: CafeType::from_alias(&dominant_type),
            },
            themes: CafeThemeAggregate {
                counts,
                current_theme: current_theme.as_deref().map(CafeTheme::from_alias),
            },
            version: row.try_get("version")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

impl Review {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let theme: Option<String> = row.try_get("theme")?;

        Ok(Self {
            id: parse_guid(row.try_get("guid")?)?,
            cafe_id: parse_guid(row.try_get("cafe_guid")?)?,
            member_id: parse_guid(row.try_get("member_guid")?)?,
            content: row.try_get("content")?,
            index: ReviewIndex::new(
                row.try_get("coffee")?,
                row.try_get("space")?,
                row.try_get("price")?,
                row.try_get("noise")?,
            ),
            theme: theme.as_deref().map(CafeTheme::from_alias),
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

impl ReviewImage {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: parse_guid(row.try_get("guid")?)?,
            review_id: parse_guid(row.try_get("review_guid")?)?,
            url: row.try_get("url")?,
        })
    }
}

impl OrphanFileHistory {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let file_type: String = row.try_get("file_type")?;
        let domain: String = row.try_get("domain")?;

        Ok(Self {
            id: parse_guid(row.try_get("guid")?)?,
            file_name: row.try_get("file_name")?,
            file_type: FileType::parse(&file_type).ok_or_else(|| {
                Error::Internal(format!("Unknown file type in database: {}", file_type))
            })?,
            domain: FileDomain::parse(&domain)
                .ok_or_else(|| Error::Internal(format!("Unknown domain in database: {}", domain)))?,
            url: row.try_get("url")?,
            is_hard_deleted: row.try_get("is_hard_deleted")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
        })
    }
}
