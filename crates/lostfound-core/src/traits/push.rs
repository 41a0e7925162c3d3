//! Push delivery trait for pluggable messaging providers.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::id::UserId;

/// A device push addressed to a user.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PushMessage {
    /// Notification title line.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Opaque key/value data delivered with the push.
    pub data: HashMap<String, String>,
}

impl PushMessage {
    /// Create a push message without extra data.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: HashMap::new(),
        }
    }

    /// Attach a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Delivers pushes to a user's registered device.
///
/// Implementations resolve the recipient's device token themselves. A
/// missing token is a silent no-op and delivery failures are logged, never
/// returned: callers cannot observe whether a push went out.
#[async_trait]
pub trait PushDispatcher: Send + Sync + std::fmt::Debug + 'static {
    /// Send a push to `recipient`.
    async fn send(&self, recipient: UserId, message: PushMessage);
}
