//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lostfound_core::types::id::{ItemId, MatchId, UserId};

use super::category::ItemCategory;
use super::status::{ItemStatus, Partition};

/// A lost or found report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Short title, compared by the matcher.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Item category.
    pub category: ItemCategory,
    /// Free-text location where the item was lost or found.
    pub location: String,
    /// When the item was lost or found.
    pub occurred_at: DateTime<Utc>,
    /// Reference to an uploaded image, if any.
    pub image_url: Option<String>,
    /// The reporting user.
    pub reporter_id: UserId,
    /// Display name of the reporting user.
    pub reporter_name: String,
    /// Lost or found.
    pub status: ItemStatus,
    /// Partition the record currently lives in.
    pub partition: Partition,
    /// Whether the report is still in circulation.
    pub is_active: bool,
    /// Whether an approved match archived this item.
    pub is_matched: bool,
    /// The approved match, once archived.
    pub match_id: Option<MatchId>,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// When the report was last modified.
    pub updated_at: DateTime<Utc>,
    /// When the item moved to the archive partition.
    pub archived_at: Option<DateTime<Utc>>,
}

/// Data required to report a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Item category.
    pub category: ItemCategory,
    /// Where it was lost or found.
    pub location: String,
    /// When it was lost or found.
    pub occurred_at: DateTime<Utc>,
    /// Image reference.
    pub image_url: Option<String>,
    /// Lost or found.
    pub status: ItemStatus,
    /// The reporting user.
    pub reporter_id: UserId,
    /// Display name of the reporting user.
    pub reporter_name: String,
}

impl Item {
    /// Build an active record in the source partition for `data.status`.
    pub fn from_new(data: NewItem) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            occurred_at: data.occurred_at,
            image_url: data.image_url,
            reporter_id: data.reporter_id,
            reporter_name: data.reporter_name,
            partition: Partition::for_status(data.status),
            status: data.status,
            is_active: true,
            is_matched: false,
            match_id: None,
            created_at: now,
            updated_at: now,
            archived_at: None,
        }
    }

    /// The location with case folded and surrounding whitespace removed.
    pub fn normalized_location(&self) -> String {
        normalize_location(&self.location)
    }

    /// Whether the report is active in a source partition.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.is_matched && self.partition.is_source()
    }

    /// The record as it looks once archived for `match_id`.
    pub fn into_archived(mut self, match_id: MatchId, at: DateTime<Utc>) -> Self {
        self.partition = Partition::MatchedItems;
        self.is_active = false;
        self.is_matched = true;
        self.match_id = Some(match_id);
        self.archived_at = Some(at);
        self.updated_at = at;
        self
    }
}

/// Case-insensitive location key used for exact location matching.
pub fn normalize_location(location: &str) -> String {
    location.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ItemStatus) -> Item {
        Item::from_new(NewItem {
            title: "Blue umbrella".to_string(),
            description: "Folding, wooden handle".to_string(),
            category: ItemCategory::Accessories,
            location: "  Main Library ".to_string(),
            occurred_at: Utc::now(),
            image_url: None,
            status,
            reporter_id: UserId::new(),
            reporter_name: "Sam".to_string(),
        })
    }

    #[test]
    fn test_new_item_is_active_in_source_partition() {
        let item = sample(ItemStatus::Found);
        assert_eq!(item.partition, Partition::FoundItems);
        assert!(item.is_available());
        assert!(item.match_id.is_none());
    }

    #[test]
    fn test_normalized_location() {
        assert_eq!(sample(ItemStatus::Lost).normalized_location(), "main library");
    }

    #[test]
    fn test_into_archived_flags() {
        let match_id = MatchId::new();
        let archived = sample(ItemStatus::Lost).into_archived(match_id, Utc::now());
        assert_eq!(archived.partition, Partition::MatchedItems);
        assert!(archived.is_matched);
        assert!(!archived.is_active);
        assert_eq!(archived.match_id, Some(match_id));
        assert!(archived.archived_at.is_some());
        assert!(!archived.is_available());
    }
}
