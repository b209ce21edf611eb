//! cafe-api library
//!
//! HTTP surface over the cafe rule engine: cafes, reviews and orphan-file
//! reconciliation. Exposed as a library so integration tests can drive the
//! router directly.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Retry budget for optimistic cafe updates
    pub max_lock_wait_ms: u64,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, max_lock_wait_ms: u64) -> Self {
        Self {
            db,
            max_lock_wait_ms,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::cafe_routes())
        .merge(api::review_routes())
        .merge(api::orphan_file_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
