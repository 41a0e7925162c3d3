//! Match entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lostfound_core::types::id::{ItemId, MatchId, UserId};

use super::status::MatchStatus;

/// Which side of a match a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchParty {
    /// The reporter of the subject item.
    ItemOwner,
    /// The other user, claiming or returning the subject item.
    Claimant,
}

/// A proposed or confirmed pairing between a lost and a found report.
///
/// Matches are never deleted; resolved matches are the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Match {
    /// Unique match identifier.
    pub id: MatchId,
    /// The item that is archived when the match is approved.
    pub item_id: ItemId,
    /// The report that caused a system-generated match, if any.
    pub counterpart_item_id: Option<ItemId>,
    /// Title of the subject item at request time.
    pub item_title: String,
    /// Reporter of the subject item.
    pub item_owner_id: UserId,
    /// The other party.
    pub claimant_id: UserId,
    /// Whichever party initiated the request.
    pub requester_id: UserId,
    /// Lifecycle state.
    pub status: MatchStatus,
    /// Owner side approval.
    pub item_owner_approved: bool,
    /// Claimant side approval.
    pub claimant_approved: bool,
    /// Whether the resolution notification went out.
    pub notification_sent: bool,
    /// When the match was created.
    pub created_at: DateTime<Utc>,
    /// When the match was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the match was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Data required to open a match request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMatch {
    /// Subject item.
    pub item_id: ItemId,
    /// Report that caused a system-generated match.
    pub counterpart_item_id: Option<ItemId>,
    /// Title of the subject item.
    pub item_title: String,
    /// Reporter of the subject item.
    pub item_owner_id: UserId,
    /// The other party.
    pub claimant_id: UserId,
    /// Initiating party.
    pub requester_id: UserId,
}

impl Match {
    /// Build a pending match. The requester is auto-approved on their own side.
    pub fn request(data: NewMatch) -> Self {
        let now = Utc::now();
        Self {
            id: MatchId::new(),
            item_owner_approved: data.requester_id == data.item_owner_id,
            claimant_approved: data.requester_id == data.claimant_id,
            item_id: data.item_id,
            counterpart_item_id: data.counterpart_item_id,
            item_title: data.item_title,
            item_owner_id: data.item_owner_id,
            claimant_id: data.claimant_id,
            requester_id: data.requester_id,
            status: MatchStatus::Pending,
            notification_sent: false,
            created_at: now,
            approved_at: None,
            updated_at: now,
        }
    }

    /// Whether the match still awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    /// The side `user_id` is on, if any. The owner side wins when a user
    /// somehow holds both roles.
    pub fn party_of(&self, user_id: UserId) -> Option<MatchParty> {
        if user_id == self.item_owner_id {
            Some(MatchParty::ItemOwner)
        } else if user_id == self.claimant_id {
            Some(MatchParty::Claimant)
        } else {
            None
        }
    }

    /// The party expected to decide: whoever did not make the request.
    pub fn responder_id(&self) -> UserId {
        if self.requester_id == self.item_owner_id {
            self.claimant_id
        } else {
            self.item_owner_id
        }
    }

    /// Whether `user_id` has an open stake in this pending match: they made
    /// the request, or they are a party whose side is not yet approved.
    pub fn involves_unresolved(&self, user_id: UserId) -> bool {
        self.is_pending()
            && (self.requester_id == user_id
                || (self.item_owner_id == user_id && !self.item_owner_approved)
                || (self.claimant_id == user_id && !self.claimant_approved))
    }

    /// The record after `party` approves. Single-sided: one approval settles it.
    pub fn approved_by(mut self, party: MatchParty, at: DateTime<Utc>) -> Self {
        match party {
            MatchParty::ItemOwner => self.item_owner_approved = true,
            MatchParty::Claimant => self.claimant_approved = true,
        }
        self.status = MatchStatus::Approved;
        self.approved_at = Some(at);
        self.notification_sent = true;
        self.updated_at = at;
        self
    }

    /// The record after a rejection.
    pub fn rejected(mut self, at: DateTime<Utc>) -> Self {
        self.status = MatchStatus::Rejected;
        self.notification_sent = true;
        self.updated_at = at;
        self
    }
}
