//! Item creation event delivered to the candidate matcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Item;
use super::status::Partition;

/// Emitted once a new report is persisted. Carries the full record so the
/// matcher does not need to read it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemReported {
    /// The newly created item.
    pub item: Item,
    /// Partition the item was written to.
    pub partition: Partition,
    /// When the event was emitted.
    pub emitted_at: DateTime<Utc>,
}

impl ItemReported {
    /// Build the event for a freshly stored item.
    pub fn new(item: Item) -> Self {
        Self {
            partition: item.partition,
            item,
            emitted_at: Utc::now(),
        }
    }
}
