//! Report status and storage partition.

use serde::{Deserialize, Serialize};

/// Whether an item was reported as lost or found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// The reporter lost the item.
    Lost,
    /// The reporter found the item.
    Found,
}

impl ItemStatus {
    /// The status a counterpart report must have.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Lost => Self::Found,
            Self::Found => Self::Lost,
        }
    }

    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage partition an item currently lives in.
///
/// Active reports live in the source partition of their status; confirmed
/// matches are relocated to [`Partition::MatchedItems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_partition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Active lost reports.
    LostItems,
    /// Active found reports.
    FoundItems,
    /// Archive of items removed from circulation by an approved match.
    MatchedItems,
}

impl Partition {
    /// Source partitions, in the order they are probed.
    pub const SOURCES: [Partition; 2] = [Self::LostItems, Self::FoundItems];

    /// The source partition holding active reports of `status`.
    pub fn for_status(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Lost => Self::LostItems,
            ItemStatus::Found => Self::FoundItems,
        }
    }

    /// Whether this partition holds active reports.
    pub fn is_source(&self) -> bool {
        !matches!(self, Self::MatchedItems)
    }

    /// Return the partition name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LostItems => "lost_items",
            Self::FoundItems => "found_items",
            Self::MatchedItems => "matched_items",
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
