//! Recounts the item partitions and users into a monthly snapshot.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_database::store::{ItemStore, MetricsStore, UserDirectory};
use lostfound_entity::item::Partition;
use lostfound_entity::metrics::{MetricsSnapshot, period_key};

/// Derives usage metrics from a live scan of the source tables.
#[derive(Debug, Clone)]
pub struct MetricsService {
    /// Item store.
    items: Arc<dyn ItemStore>,
    /// User directory.
    users: Arc<dyn UserDirectory>,
    /// Snapshot store.
    snapshots: Arc<dyn MetricsStore>,
}

impl MetricsService {
    /// Creates a new metrics service.
    pub fn new(
        items: Arc<dyn ItemStore>,
        users: Arc<dyn UserDirectory>,
        snapshots: Arc<dyn MetricsStore>,
    ) -> Self {
        Self {
            items,
            users,
            snapshots,
        }
    }

    /// Recounts and overwrites the snapshot for the current month.
    pub async fn recompute(&self) -> AppResult<MetricsSnapshot> {
        let now = Utc::now();
        let snapshot = MetricsSnapshot {
            period: period_key(now),
            lost_items: self.items.count(Partition::LostItems).await?,
            found_items: self.items.count(Partition::FoundItems).await?,
            matched_items: self.items.count(Partition::MatchedItems).await?,
            users: self.users.count_users().await?,
            computed_at: now,
        };

        let stored = self.snapshots.upsert_snapshot(&snapshot).await?;
        info!(
            period = %stored.period,
            lost = stored.lost_items,
            found = stored.found_items,
            matched = stored.matched_items,
            users = stored.users,
            "Metrics recomputed"
        );
        Ok(stored)
    }

    /// Reads the snapshot for a `YYYY-MM` period.
    pub async fn snapshot(&self, period: &str) -> AppResult<MetricsSnapshot> {
        if NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_err()
            || period.len() != 7
        {
            return Err(AppError::validation(format!(
                "Invalid period '{period}', expected YYYY-MM"
            )));
        }
        self.snapshots
            .find_snapshot(period)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No metrics for period {period}")))
    }
}
