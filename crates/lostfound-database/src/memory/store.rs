//! In-memory store backed by a lock-protected ledger and concurrent maps.
//!
//! Items and matches share one ledger behind a single lock so approval and
//! rejection commit atomically, mirroring the row locks of the PostgreSQL
//! repositories. Notifications, users and snapshots are independent and
//! live in their own maps.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_core::types::id::{ItemId, MatchId, NotificationId, UserId};
use lostfound_entity::item::{Item, ItemCategory, Partition};
use lostfound_entity::matching::{Match, MatchStatus};
use lostfound_entity::metrics::MetricsSnapshot;
use lostfound_entity::notification::Notification;
use lostfound_entity::user::UserProfile;

use crate::store::{
    ApprovalCommit, ApprovalOutcome, ItemStore, MatchStore, MetricsStore, NotificationStore,
    UserDirectory,
};

#[derive(Debug, Default)]
struct Ledger {
    items: HashMap<ItemId, Item>,
    matches: HashMap<MatchId, Match>,
}

impl Ledger {
    fn pending_match(&self, id: MatchId) -> AppResult<&Match> {
        let record = self
            .matches
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("Match {id} not found")))?;
        if record.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Match {id} is already {}",
                record.status
            )));
        }
        Ok(record)
    }
}

/// Store holding all state in process memory. Cheap to clone; clones share
/// the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ledger: Arc<RwLock<Ledger>>,
    notifications: Arc<DashMap<NotificationId, Notification>>,
    users: Arc<DashMap<UserId, UserProfile>>,
    snapshots: Arc<DashMap<String, MetricsSnapshot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a user profile.
    pub fn put_user(&self, profile: UserProfile) {
        self.users.insert(profile.id, profile);
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn insert(&self, item: &Item) -> AppResult<Item> {
        let mut ledger = self.ledger.write().await;
        if ledger.items.contains_key(&item.id) {
            return Err(AppError::conflict(format!("Item {} already exists", item.id)));
        }
        ledger.items.insert(item.id, item.clone());
        Ok(item.clone())
    }

    async fn locate(&self, id: ItemId) -> AppResult<Option<Item>> {
        Ok(self.ledger.read().await.items.get(&id).cloned())
    }

    async fn find_in(&self, partition: Partition, id: ItemId) -> AppResult<Option<Item>> {
        Ok(self
            .ledger
            .read()
            .await
            .items
            .get(&id)
            .filter(|item| item.partition == partition)
            .cloned())
    }

    async fn find_active(
        &self,
        partition: Partition,
        category: Option<ItemCategory>,
    ) -> AppResult<Vec<Item>> {
        let ledger = self.ledger.read().await;
        let mut items: Vec<Item> = ledger
            .items
            .values()
            .filter(|item| item.partition == partition && item.is_active)
            .filter(|item| category.is_none_or(|c| item.category == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn delete(&self, partition: Partition, id: ItemId) -> AppResult<bool> {
        let mut ledger = self.ledger.write().await;
        let present = ledger
            .items
            .get(&id)
            .is_some_and(|item| item.partition == partition);
        if present {
            ledger.items.remove(&id);
        }
        Ok(present)
    }

    async fn count(&self, partition: Partition) -> AppResult<i64> {
        let ledger = self.ledger.read().await;
        let count = ledger
            .items
            .values()
            .filter(|item| item.partition == partition)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn insert(&self, record: &Match) -> AppResult<Match> {
        let mut ledger = self.ledger.write().await;
        if ledger.matches.contains_key(&record.id) {
            return Err(AppError::conflict(format!("Match {} already exists", record.id)));
        }
        ledger.matches.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: MatchId) -> AppResult<Option<Match>> {
        Ok(self.ledger.read().await.matches.get(&id).cloned())
    }

    async fn find_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>> {
        let ledger = self.ledger.read().await;
        let mut found: Vec<Match> = ledger
            .matches
            .values()
            .filter(|m| m.item_id == item_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn find_pending_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>> {
        Ok(self
            .find_for_item(item_id)
            .await?
            .into_iter()
            .filter(|m| m.status == MatchStatus::Pending)
            .collect())
    }

    async fn commit_approval(&self, commit: &ApprovalCommit) -> AppResult<ApprovalOutcome> {
        let mut ledger = self.ledger.write().await;

        let current = ledger.pending_match(commit.match_id)?.clone();
        let item = ledger
            .items
            .get(&current.item_id)
            .filter(|item| item.partition.is_source())
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Item {} not found in lost or found items",
                    current.item_id
                ))
            })?;

        // Nothing is written until both records are known to be valid.
        let source = item.partition;
        let archived_item = item.into_archived(current.id, commit.at);
        let matched = current.approved_by(commit.party, commit.at);
        ledger.items.insert(archived_item.id, archived_item.clone());
        ledger.matches.insert(matched.id, matched.clone());

        debug!(match_id = %matched.id, item_id = %archived_item.id, %source, "Approval committed");
        Ok(ApprovalOutcome {
            matched,
            archived_item,
            source,
        })
    }

    async fn commit_rejection(&self, id: MatchId, at: DateTime<Utc>) -> AppResult<Match> {
        let mut ledger = self.ledger.write().await;
        let rejected = ledger.pending_match(id)?.clone().rejected(at);
        ledger.matches.insert(id, rejected.clone());
        Ok(rejected)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, notification: &Notification) -> AppResult<Notification> {
        self.notifications
            .insert(notification.id, notification.clone());
        Ok(notification.clone())
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut entry) if entry.recipient_id == recipient => {
                if !entry.is_read {
                    entry.is_read = true;
                    entry.read_at = Some(at);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let mut changed = 0u64;
        for mut entry in self.notifications.iter_mut() {
            if entry.recipient_id == recipient && !entry.is_read {
                entry.is_read = true;
                entry.read_at = Some(at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        Ok(self
            .notifications
            .remove_if(&id, |_, n| n.recipient_id == recipient)
            .is_some())
    }

    async fn list_by_recipient(&self, recipient: UserId) -> AppResult<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|entry| entry.recipient_id == recipient)
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn count_unread(&self, recipient: UserId) -> AppResult<i64> {
        let count = self
            .notifications
            .iter()
            .filter(|entry| entry.recipient_id == recipient && !entry.is_read)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn get_user(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn count_users(&self) -> AppResult<i64> {
        Ok(self.users.len() as i64)
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn upsert_snapshot(&self, snapshot: &MetricsSnapshot) -> AppResult<MetricsSnapshot> {
        self.snapshots
            .insert(snapshot.period.clone(), snapshot.clone());
        Ok(snapshot.clone())
    }

    async fn find_snapshot(&self, period: &str) -> AppResult<Option<MetricsSnapshot>> {
        Ok(self.snapshots.get(period).map(|entry| entry.value().clone()))
    }
}
