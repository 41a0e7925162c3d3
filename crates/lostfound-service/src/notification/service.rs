//! Notification persistence, push delivery and inbox operations.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_core::traits::push::PushDispatcher;
use lostfound_core::types::id::NotificationId;
use lostfound_database::store::NotificationStore;
use lostfound_entity::notification::{NewNotification, Notification};

use crate::context::RequestContext;

/// Persists notifications, pushes them to devices and serves the inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Device push delivery.
    push: Arc<dyn PushDispatcher>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, push: Arc<dyn PushDispatcher>) -> Self {
        Self { store, push }
    }

    /// Stores a notification, then pushes it to the recipient's device.
    ///
    /// Only the store write can fail; push failures are handled by the
    /// dispatcher.
    pub async fn notify(&self, data: NewNotification) -> AppResult<Notification> {
        let notification = self.store.insert(&Notification::from_new(data)).await?;

        self.push
            .send(notification.recipient_id, notification.to_push())
            .await;

        debug!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            kind = %notification.notification_type,
            "Notification dispatched"
        );
        Ok(notification)
    }

    /// Lists the current user's notifications, newest first.
    pub async fn list_notifications(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.store.list_by_recipient(ctx.user_id).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.store.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> AppResult<()> {
        if !self
            .store
            .mark_read(notification_id, ctx.user_id, Utc::now())
            .await?
        {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let changed = self.store.mark_all_read(ctx.user_id, Utc::now()).await?;
        info!(user_id = %ctx.user_id, changed, "Marked all notifications read");
        Ok(changed)
    }

    /// Deletes a notification from the current user's inbox.
    pub async fn dismiss(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> AppResult<()> {
        if !self.store.delete(notification_id, ctx.user_id).await? {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }
}
