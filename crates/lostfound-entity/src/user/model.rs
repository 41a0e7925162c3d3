//! User profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lostfound_core::types::id::UserId;

/// The slice of a user profile this service reads. Profiles are owned by
/// the external identity system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Registered device push token.
    pub push_token: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}
