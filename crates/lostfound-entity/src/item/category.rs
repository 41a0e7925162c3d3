//! Item category enumeration.

use serde::{Deserialize, Serialize};

/// Category of a reported item. Matching only pairs items of equal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Phones, laptops, chargers.
    Electronics,
    /// Jackets, scarves, hats.
    Clothing,
    /// Jewelry, watches, glasses.
    Accessories,
    /// Books and notes.
    Books,
    /// Keys and key cards.
    Keys,
    /// Backpacks, purses.
    Bags,
    /// IDs, cards, paperwork.
    Documents,
    /// Anything else.
    Other,
}

impl ItemCategory {
    /// All categories in display order.
    pub const ALL: [ItemCategory; 8] = [
        Self::Electronics,
        Self::Clothing,
        Self::Accessories,
        Self::Books,
        Self::Keys,
        Self::Bags,
        Self::Documents,
        Self::Other,
    ];

    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Accessories => "accessories",
            Self::Books => "books",
            Self::Keys => "keys",
            Self::Bags => "bags",
            Self::Documents => "documents",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown item category '{s}'"))
    }
}
