//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lostfound_core::traits::push::PushMessage;
use lostfound_core::types::id::{ItemId, MatchId, NotificationId, UserId};

use super::kind::NotificationType;

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub recipient_id: UserId,
    /// The user whose action produced the notification.
    pub sender_id: UserId,
    /// Display name of the sender.
    pub sender_name: String,
    /// Related item.
    pub item_id: ItemId,
    /// Title of the related item.
    pub item_title: String,
    /// Related match.
    pub match_id: MatchId,
    /// Type tag.
    pub notification_type: NotificationType,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Recipient.
    pub recipient_id: UserId,
    /// Sender.
    pub sender_id: UserId,
    /// Sender display name.
    pub sender_name: String,
    /// Related item.
    pub item_id: ItemId,
    /// Related item title.
    pub item_title: String,
    /// Related match.
    pub match_id: MatchId,
    /// Type tag.
    pub notification_type: NotificationType,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notification {
    /// Build an unread notification.
    pub fn from_new(data: NewNotification) -> Self {
        Self {
            id: NotificationId::new(),
            recipient_id: data.recipient_id,
            sender_id: data.sender_id,
            sender_name: data.sender_name,
            item_id: data.item_id,
            item_title: data.item_title,
            match_id: data.match_id,
            notification_type: data.notification_type,
            title: data.title,
            message: data.message,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    /// The device push carrying this notification.
    pub fn to_push(&self) -> PushMessage {
        PushMessage::new(self.title.clone(), self.message.clone())
            .with_data("notificationId", self.id.to_string())
            .with_data("type", self.notification_type.as_str())
            .with_data("itemId", self.item_id.to_string())
            .with_data("matchId", self.match_id.to_string())
    }
}
