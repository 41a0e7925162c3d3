//! Match repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use lostfound_core::error::{AppError, ErrorKind};
use lostfound_core::result::AppResult;
use lostfound_core::types::id::{ItemId, MatchId};
use lostfound_entity::item::{Item, Partition};
use lostfound_entity::matching::{Match, MatchParty, MatchStatus};

use crate::store::{ApprovalCommit, ApprovalOutcome, MatchStore};

/// Repository for match records and their transactional transitions.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    /// Create a new match repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explain why a conditional update on `id` matched no row.
    async fn missing_or_decided(&self, id: MatchId) -> AppError {
        match self.find_by_id(id).await {
            Ok(Some(existing)) => AppError::invalid_state(format!(
                "Match {id} is already {}",
                existing.status
            )),
            Ok(None) => AppError::not_found(format!("Match {id} not found")),
            Err(e) => e,
        }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl MatchStore for MatchRepository {
    async fn insert(&self, record: &Match) -> AppResult<Match> {
        sqlx::query_as::<_, Match>(
            "INSERT INTO matches (id, item_id, counterpart_item_id, item_title, item_owner_id, \
             claimant_id, requester_id, status, item_owner_approved, claimant_approved, \
             notification_sent, created_at, approved_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(record.id)
        .bind(record.item_id)
        .bind(record.counterpart_item_id)
        .bind(&record.item_title)
        .bind(record.item_owner_id)
        .bind(record.claimant_id)
        .bind(record.requester_id)
        .bind(record.status)
        .bind(record.item_owner_approved)
        .bind(record.claimant_approved)
        .bind(record.notification_sent)
        .bind(record.created_at)
        .bind(record.approved_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create match"))
    }

    async fn find_by_id(&self, id: MatchId) -> AppResult<Option<Match>> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find match"))
    }

    async fn find_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE item_id = $1")
            .bind(item_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list matches for item"))
    }

    async fn find_pending_for_item(&self, item_id: ItemId) -> AppResult<Vec<Match>> {
        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE item_id = $1 AND status = $2")
            .bind(item_id)
            .bind(MatchStatus::Pending)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list pending matches"))
    }

    async fn commit_approval(&self, commit: &ApprovalCommit) -> AppResult<ApprovalOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin approval transaction"))?;

        // Row lock serializes concurrent approvals of the same match.
        let current = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1 FOR UPDATE")
            .bind(commit.match_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Failed to load match"))?
            .ok_or_else(|| AppError::not_found(format!("Match {} not found", commit.match_id)))?;

        if current.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Match {} is already {}",
                current.id, current.status
            )));
        }

        let item = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE id = $1 AND partition IN ($2, $3) FOR UPDATE",
        )
        .bind(current.item_id)
        .bind(Partition::LostItems)
        .bind(Partition::FoundItems)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to locate match item"))?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Item {} not found in lost or found items",
                current.item_id
            ))
        })?;
        let source = item.partition;

        let archived_item = sqlx::query_as::<_, Item>(
            "UPDATE items SET partition = $2, is_active = FALSE, is_matched = TRUE, \
             match_id = $3, archived_at = $4, updated_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(item.id)
        .bind(Partition::MatchedItems)
        .bind(current.id)
        .bind(commit.at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to archive item"))?;

        let (owner_approved, claimant_approved) = match commit.party {
            MatchParty::ItemOwner => (true, current.claimant_approved),
            MatchParty::Claimant => (current.item_owner_approved, true),
        };

        let matched = sqlx::query_as::<_, Match>(
            "UPDATE matches SET status = $2, item_owner_approved = $3, claimant_approved = $4, \
             approved_at = $5, notification_sent = TRUE, updated_at = $5 \
             WHERE id = $1 AND status = $6 RETURNING *",
        )
        .bind(current.id)
        .bind(MatchStatus::Approved)
        .bind(owner_approved)
        .bind(claimant_approved)
        .bind(commit.at)
        .bind(MatchStatus::Pending)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to approve match"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit approval"))?;

        debug!(match_id = %matched.id, item_id = %archived_item.id, %source, "Approval committed");
        Ok(ApprovalOutcome {
            matched,
            archived_item,
            source,
        })
    }

    async fn commit_rejection(&self, id: MatchId, at: DateTime<Utc>) -> AppResult<Match> {
        let updated = sqlx::query_as::<_, Match>(
            "UPDATE matches SET status = $2, notification_sent = TRUE, updated_at = $3 \
             WHERE id = $1 AND status = $4 RETURNING *",
        )
        .bind(id)
        .bind(MatchStatus::Rejected)
        .bind(at)
        .bind(MatchStatus::Pending)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to reject match"))?;

        match updated {
            Some(record) => Ok(record),
            None => Err(self.missing_or_decided(id).await),
        }
    }
}
