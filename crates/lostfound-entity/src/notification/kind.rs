//! Notification type tags.

use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A found report may be the recipient's lost item.
    HaveItem,
    /// A lost report may be claiming the recipient's found item.
    ClaimItem,
    /// A user asked the recipient to confirm a match.
    MatchRequest,
    /// The recipient's request was approved.
    MatchApproved,
    /// The recipient's request was rejected.
    MatchRejected,
}

impl NotificationType {
    /// Return the type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HaveItem => "have_item",
            Self::ClaimItem => "claim_item",
            Self::MatchRequest => "match_request",
            Self::MatchApproved => "match_approved",
            Self::MatchRejected => "match_rejected",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
