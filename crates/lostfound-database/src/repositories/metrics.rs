//! Metrics snapshot repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lostfound_core::error::{AppError, ErrorKind};
use lostfound_core::result::AppResult;
use lostfound_entity::metrics::MetricsSnapshot;

use crate::store::MetricsStore;

/// Repository for monthly metrics snapshots.
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    pool: PgPool,
}

impl MetricsRepository {
    /// Create a new metrics repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricsStore for MetricsRepository {
    async fn upsert_snapshot(&self, snapshot: &MetricsSnapshot) -> AppResult<MetricsSnapshot> {
        sqlx::query_as::<_, MetricsSnapshot>(
            "INSERT INTO metrics_snapshots (period, lost_items, found_items, matched_items, users, computed_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (period) DO UPDATE SET \
                lost_items = EXCLUDED.lost_items, \
                found_items = EXCLUDED.found_items, \
                matched_items = EXCLUDED.matched_items, \
                users = EXCLUDED.users, \
                computed_at = EXCLUDED.computed_at \
             RETURNING *",
        )
        .bind(&snapshot.period)
        .bind(snapshot.lost_items)
        .bind(snapshot.found_items)
        .bind(snapshot.matched_items)
        .bind(snapshot.users)
        .bind(snapshot.computed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store metrics", e))
    }

    async fn find_snapshot(&self, period: &str) -> AppResult<Option<MetricsSnapshot>> {
        sqlx::query_as::<_, MetricsSnapshot>("SELECT * FROM metrics_snapshots WHERE period = $1")
            .bind(period)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find metrics", e))
    }
}
