//! Request DTOs.

use serde::{Deserialize, Serialize};

use lostfound_core::types::id::ItemId;
use lostfound_entity::item::{ItemCategory, ItemStatus};

/// Body of `POST /api/matches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimItemRequest {
    /// The item being claimed.
    pub item_id: ItemId,
}

/// Query of `GET /api/items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItemsQuery {
    /// Lost or found.
    pub status: ItemStatus,
    /// Optional category filter.
    #[serde(default)]
    pub category: Option<ItemCategory>,
}
