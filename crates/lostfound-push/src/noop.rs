//! Dispatcher that only logs.

use async_trait::async_trait;
use tracing::debug;

use lostfound_core::traits::push::{PushDispatcher, PushMessage};
use lostfound_core::types::id::UserId;

/// Push dispatcher used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPushDispatcher;

#[async_trait]
impl PushDispatcher for NoopPushDispatcher {
    async fn send(&self, recipient: UserId, message: PushMessage) {
        debug!(recipient_id = %recipient, title = %message.title, "Push skipped, no provider");
    }
}
