//! Monthly metrics snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregate counts for one month. Always equal to a recount of the source
/// tables at `computed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MetricsSnapshot {
    /// Month key, `YYYY-MM`.
    pub period: String,
    /// Items in the lost partition.
    pub lost_items: i64,
    /// Items in the found partition.
    pub found_items: i64,
    /// Items in the archive partition.
    pub matched_items: i64,
    /// Known users.
    pub users: i64,
    /// When the counts were taken.
    pub computed_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Whether two snapshots carry the same counts, ignoring timestamps.
    pub fn same_counts(&self, other: &Self) -> bool {
        self.period == other.period
            && self.lost_items == other.lost_items
            && self.found_items == other.found_items
            && self.matched_items == other.matched_items
            && self.users == other.users
    }
}

/// Snapshot key for the month containing `at`.
pub fn period_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}
