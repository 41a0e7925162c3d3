//! Match lifecycle: request, approval and rejection.
//!
//! A match moves from `pending` to exactly one of `approved` or `rejected`.
//! Both transitions are conditional writes in the store, so a second
//! decision on the same match fails with `InvalidState` and never repeats
//! the archival or the notification.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_core::types::id::{ItemId, MatchId, UserId};
use lostfound_database::store::{ApprovalCommit, ItemStore, MatchStore};
use lostfound_entity::matching::{Match, MatchParty, MatchStatus, NewMatch};
use lostfound_entity::notification::{NewNotification, NotificationType};

use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::notification::messages;

/// Parameters for opening a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Subject item, archived on approval.
    pub item_id: ItemId,
    /// Newly reported item that caused a system-generated request.
    pub counterpart_item_id: Option<ItemId>,
    /// Reporter of the subject item.
    pub item_owner_id: UserId,
    /// The other party.
    pub claimant_id: UserId,
    /// Initiating party; must be the owner or the claimant.
    pub requester_id: UserId,
    /// Title of the subject item.
    pub item_title: String,
    /// Display name of the requester.
    pub requester_name: String,
    /// Type of the notification sent to the responder.
    pub notification_type: NotificationType,
}

impl MatchRequest {
    /// A user-initiated request notified as `match_request`.
    pub fn new(
        item_id: ItemId,
        item_owner_id: UserId,
        claimant_id: UserId,
        requester_id: UserId,
        item_title: impl Into<String>,
        requester_name: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            counterpart_item_id: None,
            item_owner_id,
            claimant_id,
            requester_id,
            item_title: item_title.into(),
            requester_name: requester_name.into(),
            notification_type: NotificationType::MatchRequest,
        }
    }

    /// Record the report that caused this request.
    pub fn with_counterpart(mut self, item_id: ItemId) -> Self {
        self.counterpart_item_id = Some(item_id);
        self
    }

    /// Override the notification type sent to the responder.
    pub fn with_notification(mut self, kind: NotificationType) -> Self {
        self.notification_type = kind;
        self
    }
}

/// Owns match state transitions and their notifications.
#[derive(Debug, Clone)]
pub struct MatchLifecycleService {
    /// Item store, for user-initiated claims.
    items: Arc<dyn ItemStore>,
    /// Match store.
    matches: Arc<dyn MatchStore>,
    /// Notification dispatch.
    notifications: Arc<NotificationService>,
}

impl MatchLifecycleService {
    /// Creates a new lifecycle service.
    pub fn new(
        items: Arc<dyn ItemStore>,
        matches: Arc<dyn MatchStore>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            items,
            matches,
            notifications,
        }
    }

    /// Opens a pending match and notifies the party that did not request it.
    ///
    /// The requester's own side is approved up front. Callers are expected
    /// to check [`Self::get_pending_match_for_user`] first.
    pub async fn create_match_request(&self, request: MatchRequest) -> AppResult<Match> {
        if request.item_owner_id == request.claimant_id {
            return Err(AppError::validation(
                "Item owner and claimant must be different users",
            ));
        }
        if request.requester_id != request.item_owner_id
            && request.requester_id != request.claimant_id
        {
            return Err(AppError::validation(
                "Requester must be the item owner or the claimant",
            ));
        }

        let record = self
            .matches
            .insert(&Match::request(NewMatch {
                item_id: request.item_id,
                counterpart_item_id: request.counterpart_item_id,
                item_title: request.item_title.clone(),
                item_owner_id: request.item_owner_id,
                claimant_id: request.claimant_id,
                requester_id: request.requester_id,
            }))
            .await?;

        let (title, message) = messages::compose(
            request.notification_type,
            &request.requester_name,
            &request.item_title,
        );
        self.notifications
            .notify(NewNotification {
                recipient_id: record.responder_id(),
                sender_id: request.requester_id,
                sender_name: request.requester_name,
                item_id: record.item_id,
                item_title: record.item_title.clone(),
                match_id: record.id,
                notification_type: request.notification_type,
                title,
                message,
            })
            .await?;

        info!(
            match_id = %record.id,
            item_id = %record.item_id,
            requester_id = %record.requester_id,
            "Match requested"
        );
        Ok(record)
    }

    /// Claims an item on behalf of the current user.
    ///
    /// The current user becomes claimant and requester. Fails with
    /// `Conflict` when they already have an open request on the item.
    pub async fn claim_item(&self, ctx: &RequestContext, item_id: ItemId) -> AppResult<Match> {
        let item = self
            .items
            .locate(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found")))?;

        if !item.is_available() {
            return Err(AppError::invalid_state(format!(
                "Item {item_id} is no longer available"
            )));
        }
        if item.reporter_id == ctx.user_id {
            return Err(AppError::validation("You cannot claim your own item"));
        }
        if let Some(existing) = self.get_pending_match_for_user(item_id, ctx.user_id).await? {
            return Err(AppError::conflict(format!(
                "Match {} is already pending for this item",
                existing.id
            )));
        }

        self.create_match_request(MatchRequest::new(
            item.id,
            item.reporter_id,
            ctx.user_id,
            ctx.user_id,
            item.title,
            ctx.display_name.clone(),
        ))
        .await
    }

    /// The pending match on `item_id` in which `user_id` still has an open
    /// stake, if any.
    pub async fn get_pending_match_for_user(
        &self,
        item_id: ItemId,
        user_id: UserId,
    ) -> AppResult<Option<Match>> {
        let pending = self.matches.find_pending_for_item(item_id).await?;
        Ok(pending
            .into_iter()
            .find(|m| m.involves_unresolved(user_id)))
    }

    /// Pending and approved matches for an item, in no particular order.
    pub async fn get_match_requests_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>> {
        let all = self.matches.find_for_item(item_id).await?;
        Ok(all
            .into_iter()
            .filter(|m| matches!(m.status, MatchStatus::Pending | MatchStatus::Approved))
            .collect())
    }

    /// Approves a pending match, archives its item and notifies the requester.
    ///
    /// Approval is single-sided: one approval from the party that did not
    /// request the match settles it. Other pending matches on the same item
    /// are rejected afterwards, since their subject is gone.
    pub async fn approve_match(&self, ctx: &RequestContext, match_id: MatchId) -> AppResult<Match> {
        let current = self.load_decidable(ctx, match_id).await?;
        let party = self.decider_party(ctx, &current)?;

        let outcome = self
            .matches
            .commit_approval(&ApprovalCommit {
                match_id,
                party,
                at: Utc::now(),
            })
            .await?;

        info!(
            match_id = %match_id,
            item_id = %outcome.archived_item.id,
            source = %outcome.source,
            approver_id = %ctx.user_id,
            "Match approved, item archived"
        );

        self.notify_requester(ctx, &outcome.matched, NotificationType::MatchApproved)
            .await;
        self.reject_superseded(ctx, &outcome.matched).await;
        Ok(outcome.matched)
    }

    /// Rejects a pending match and notifies the requester. The item stays
    /// active and may receive other proposals.
    pub async fn reject_match(&self, ctx: &RequestContext, match_id: MatchId) -> AppResult<Match> {
        let current = self.load_decidable(ctx, match_id).await?;
        self.decider_party(ctx, &current)?;

        let rejected = self.matches.commit_rejection(match_id, Utc::now()).await?;

        info!(match_id = %match_id, rejecter_id = %ctx.user_id, "Match rejected");

        self.notify_requester(ctx, &rejected, NotificationType::MatchRejected)
            .await;
        Ok(rejected)
    }

    async fn load_decidable(&self, ctx: &RequestContext, match_id: MatchId) -> AppResult<Match> {
        let current = self
            .matches
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Match {match_id} not found")))?;

        if current.party_of(ctx.user_id).is_none() {
            return Err(AppError::authorization(
                "Only the item owner or the claimant can decide this match",
            ));
        }
        if current.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Match {match_id} is already {}",
                current.status
            )));
        }
        Ok(current)
    }

    fn decider_party(&self, ctx: &RequestContext, current: &Match) -> AppResult<MatchParty> {
        if current.requester_id == ctx.user_id {
            return Err(AppError::validation(
                "The requester cannot decide their own match request",
            ));
        }
        current.party_of(ctx.user_id).ok_or_else(|| {
            AppError::authorization("Only the item owner or the claimant can decide this match")
        })
    }

    /// Rejects the other pending matches on an approved match's item.
    /// Best effort; the approval is already committed.
    async fn reject_superseded(&self, ctx: &RequestContext, approved: &Match) {
        let pending = match self.matches.find_pending_for_item(approved.item_id).await {
            Ok(pending) => pending,
            Err(e) => {
                error!(
                    item_id = %approved.item_id,
                    error = %e,
                    "Failed to load superseded matches"
                );
                return;
            }
        };

        for stale in pending.into_iter().filter(|m| m.id != approved.id) {
            match self.matches.commit_rejection(stale.id, Utc::now()).await {
                Ok(rejected) => {
                    info!(
                        match_id = %rejected.id,
                        approved_match_id = %approved.id,
                        "Superseded match rejected"
                    );
                    self.notify_requester(ctx, &rejected, NotificationType::MatchRejected)
                        .await;
                }
                Err(e) => warn!(
                    match_id = %stale.id,
                    error = %e,
                    "Superseded match left as is"
                ),
            }
        }
    }

    /// The decision is already committed; a failed notification is logged.
    async fn notify_requester(&self, ctx: &RequestContext, record: &Match, kind: NotificationType) {
        let (title, message) = messages::compose(kind, &ctx.display_name, &record.item_title);
        let result = self
            .notifications
            .notify(NewNotification {
                recipient_id: record.requester_id,
                sender_id: ctx.user_id,
                sender_name: ctx.display_name.clone(),
                item_id: record.item_id,
                item_title: record.item_title.clone(),
                match_id: record.id,
                notification_type: kind,
                title,
                message,
            })
            .await;

        if let Err(e) = result {
            error!(
                match_id = %record.id,
                recipient_id = %record.requester_id,
                error = %e,
                "Failed to notify requester"
            );
        }
    }
}
