//! Shared fixtures for service tests: an in-memory harness, a recording
//! push dispatcher and stores that fail on demand.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lostfound_core::config::matching::MatchingConfig;
use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_core::traits::push::{PushDispatcher, PushMessage};
use lostfound_core::types::id::{ItemId, NotificationId, UserId};
use lostfound_database::MemoryStore;
use lostfound_database::store::{ItemStore, NotificationStore};
use lostfound_entity::item::{Item, ItemCategory, ItemStatus, NewItem, Partition};
use lostfound_entity::notification::Notification;
use lostfound_entity::user::UserProfile;

use crate::context::RequestContext;
use crate::events::{EventBus, EventReceiver};
use crate::item::ItemService;
use crate::matching::{CandidateMatcher, MatchLifecycleService};
use crate::metrics::MetricsService;
use crate::notification::NotificationService;

/// Push dispatcher that records every send.
#[derive(Debug, Default)]
pub struct RecordingPush {
    sent: Mutex<Vec<(UserId, PushMessage)>>,
}

impl RecordingPush {
    pub fn sent(&self) -> Vec<(UserId, PushMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushDispatcher for RecordingPush {
    async fn send(&self, recipient: UserId, message: PushMessage) {
        self.sent.lock().unwrap().push((recipient, message));
    }
}

/// Item store whose candidate query always fails.
#[derive(Debug)]
pub struct UnqueryableItems(pub MemoryStore);

#[async_trait]
impl ItemStore for UnqueryableItems {
    async fn insert(&self, item: &Item) -> AppResult<Item> {
        ItemStore::insert(&self.0, item).await
    }

    async fn locate(&self, id: ItemId) -> AppResult<Option<Item>> {
        self.0.locate(id).await
    }

    async fn find_in(&self, partition: Partition, id: ItemId) -> AppResult<Option<Item>> {
        self.0.find_in(partition, id).await
    }

    async fn find_active(
        &self,
        _partition: Partition,
        _category: Option<ItemCategory>,
    ) -> AppResult<Vec<Item>> {
        Err(AppError::database("connection reset"))
    }

    async fn delete(&self, partition: Partition, id: ItemId) -> AppResult<bool> {
        ItemStore::delete(&self.0, partition, id).await
    }

    async fn count(&self, partition: Partition) -> AppResult<i64> {
        self.0.count(partition).await
    }
}

/// Notification store that refuses writes addressed to chosen recipients.
#[derive(Debug)]
pub struct FlakyNotifications {
    inner: MemoryStore,
    refused: Mutex<HashSet<UserId>>,
}

impl FlakyNotifications {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            refused: Mutex::new(HashSet::new()),
        }
    }

    pub fn refuse(&self, recipient: UserId) {
        self.refused.lock().unwrap().insert(recipient);
    }
}

#[async_trait]
impl NotificationStore for FlakyNotifications {
    async fn insert(&self, notification: &Notification) -> AppResult<Notification> {
        if self.refused.lock().unwrap().contains(&notification.recipient_id) {
            return Err(AppError::database("write timed out"));
        }
        NotificationStore::insert(&self.inner, notification).await
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.inner.mark_read(id, recipient, at).await
    }

    async fn mark_all_read(&self, recipient: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        self.inner.mark_all_read(recipient, at).await
    }

    async fn delete(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        NotificationStore::delete(&self.inner, id, recipient).await
    }

    async fn list_by_recipient(&self, recipient: UserId) -> AppResult<Vec<Notification>> {
        self.inner.list_by_recipient(recipient).await
    }

    async fn count_unread(&self, recipient: UserId) -> AppResult<i64> {
        self.inner.count_unread(recipient).await
    }
}

/// Every service wired over one [`MemoryStore`].
pub struct Harness {
    pub store: MemoryStore,
    pub push: Arc<RecordingPush>,
    pub notifications: Arc<NotificationService>,
    pub lifecycle: Arc<MatchLifecycleService>,
    pub matcher: Arc<CandidateMatcher>,
    pub metrics: Arc<MetricsService>,
    pub items: ItemService,
    pub events: EventReceiver,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        Self::build(
            store.clone(),
            Arc::new(store.clone()),
            Arc::new(store),
            MatchingConfig::default(),
        )
    }

    pub fn build(
        store: MemoryStore,
        items: Arc<dyn ItemStore>,
        notification_store: Arc<dyn NotificationStore>,
        matching: MatchingConfig,
    ) -> Self {
        let push = Arc::new(RecordingPush::default());
        let notifications = Arc::new(NotificationService::new(
            notification_store,
            push.clone(),
        ));
        let lifecycle = Arc::new(MatchLifecycleService::new(
            items.clone(),
            Arc::new(store.clone()),
            notifications.clone(),
        ));
        let matcher = Arc::new(CandidateMatcher::new(
            items.clone(),
            lifecycle.clone(),
            &matching,
        ));
        let metrics = Arc::new(MetricsService::new(
            items.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        ));
        let (bus, events) = EventBus::channel(64);
        let item_service = ItemService::new(items, metrics.clone(), bus, matcher.clone());

        Self {
            store,
            push,
            notifications,
            lifecycle,
            matcher,
            metrics,
            items: item_service,
            events,
        }
    }

    pub fn add_user(&self, name: &str) -> UserId {
        let id = UserId::new();
        self.store.put_user(UserProfile {
            id,
            display_name: name.to_string(),
            push_token: None,
            created_at: Utc::now(),
        });
        id
    }

    pub fn user_ctx(&self, name: &str) -> RequestContext {
        RequestContext::new(self.add_user(name), name)
    }

    /// Stores an item directly, bypassing the event bus.
    pub async fn seed(
        &self,
        reporter: &RequestContext,
        status: ItemStatus,
        category: ItemCategory,
        title: &str,
        location: &str,
    ) -> Item {
        let item = Item::from_new(NewItem {
            title: title.to_string(),
            description: String::new(),
            category,
            location: location.to_string(),
            occurred_at: Utc::now(),
            image_url: None,
            status,
            reporter_id: reporter.user_id,
            reporter_name: reporter.display_name.clone(),
        });
        ItemStore::insert(&self.store, &item).await.unwrap()
    }

    pub async fn seed_item(&self, status: ItemStatus, title: &str, location: &str) -> Item {
        let reporter = self.user_ctx("Reporter");
        self.seed(&reporter, status, ItemCategory::Bags, title, location)
            .await
    }
}
