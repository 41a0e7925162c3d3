//! Store traits for the item, match, notification, user and metrics tables.
//!
//! The service layer depends only on these traits. Each trait has a
//! PostgreSQL implementation in [`crate::repositories`] and an in-process
//! implementation in [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lostfound_core::result::AppResult;
use lostfound_core::types::id::{ItemId, MatchId, NotificationId, UserId};
use lostfound_entity::item::{Item, ItemCategory, Partition};
use lostfound_entity::matching::{Match, MatchParty};
use lostfound_entity::metrics::MetricsSnapshot;
use lostfound_entity::notification::Notification;
use lostfound_entity::user::UserProfile;

/// Item reports across the lost, found and archive partitions.
///
/// Items live in one logical table keyed by id, so an id is held by at
/// most one partition at any time.
#[async_trait]
pub trait ItemStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new item in its partition.
    async fn insert(&self, item: &Item) -> AppResult<Item>;

    /// Find an item by id, whichever partition holds it.
    async fn locate(&self, id: ItemId) -> AppResult<Option<Item>>;

    /// Find an item by id within one partition.
    async fn find_in(&self, partition: Partition, id: ItemId) -> AppResult<Option<Item>>;

    /// Active items in `partition`, optionally restricted to a category.
    async fn find_active(
        &self,
        partition: Partition,
        category: Option<ItemCategory>,
    ) -> AppResult<Vec<Item>>;

    /// Delete an item from `partition`. Returns `true` if a row was removed.
    async fn delete(&self, partition: Partition, id: ItemId) -> AppResult<bool>;

    /// Number of items in `partition`.
    async fn count(&self, partition: Partition) -> AppResult<i64>;
}

/// Parameters of an approval transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCommit {
    /// The match being approved.
    pub match_id: MatchId,
    /// The side that approves.
    pub party: MatchParty,
    /// Approval time.
    pub at: DateTime<Utc>,
}

/// Result of a committed approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    /// The match after the transition.
    pub matched: Match,
    /// The subject item as stored in the archive partition.
    pub archived_item: Item,
    /// The partition the item was moved out of.
    pub source: Partition,
}

/// Match records and their state transitions.
#[async_trait]
pub trait MatchStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new match.
    async fn insert(&self, record: &Match) -> AppResult<Match>;

    /// Find a match by id.
    async fn find_by_id(&self, id: MatchId) -> AppResult<Option<Match>>;

    /// Every match whose subject is `item_id`, in any status.
    async fn find_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>>;

    /// Pending matches whose subject is `item_id`.
    async fn find_pending_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>>;

    /// Approve a pending match and archive its subject item atomically.
    ///
    /// Fails with `NotFound` when the match does not exist or its item is in
    /// neither source partition, and with `InvalidState` when the match is no
    /// longer pending. A failure leaves both the match and the item untouched.
    async fn commit_approval(&self, commit: &ApprovalCommit) -> AppResult<ApprovalOutcome>;

    /// Reject a pending match. Fails with `NotFound` or `InvalidState` like
    /// [`MatchStore::commit_approval`]; the subject item is never touched.
    async fn commit_rejection(&self, id: MatchId, at: DateTime<Utc>) -> AppResult<Match>;
}

/// Notification inbox storage.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a notification.
    async fn insert(&self, notification: &Notification) -> AppResult<Notification>;

    /// Mark one of `recipient`'s notifications read. Returns `false` if absent.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Mark all of `recipient`'s notifications read. Returns how many changed.
    async fn mark_all_read(&self, recipient: UserId, at: DateTime<Utc>) -> AppResult<u64>;

    /// Delete one of `recipient`'s notifications. Returns `false` if absent.
    async fn delete(&self, id: NotificationId, recipient: UserId) -> AppResult<bool>;

    /// `recipient`'s notifications, newest first.
    async fn list_by_recipient(&self, recipient: UserId) -> AppResult<Vec<Notification>>;

    /// Number of unread notifications for `recipient`.
    async fn count_unread(&self, recipient: UserId) -> AppResult<i64>;
}

/// Read access to user profiles owned by the identity system.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a profile.
    async fn get_user(&self, id: UserId) -> AppResult<Option<UserProfile>>;

    /// Number of known users.
    async fn count_users(&self) -> AppResult<i64>;
}

/// Monthly metrics snapshots.
#[async_trait]
pub trait MetricsStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert or overwrite the snapshot for `snapshot.period`.
    async fn upsert_snapshot(&self, snapshot: &MetricsSnapshot) -> AppResult<MetricsSnapshot>;

    /// Read the snapshot for a `YYYY-MM` period.
    async fn find_snapshot(&self, period: &str) -> AppResult<Option<MetricsSnapshot>>;
}
