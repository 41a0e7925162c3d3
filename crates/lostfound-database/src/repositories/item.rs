//! Item repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lostfound_core::error::{AppError, ErrorKind};
use lostfound_core::result::AppResult;
use lostfound_core::types::id::ItemId;
use lostfound_entity::item::{Item, ItemCategory, Partition};

use crate::store::ItemStore;

/// Repository for item reports across all partitions.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Create a new item repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn insert(&self, item: &Item) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items (id, title, description, category, location, occurred_at, image_url, \
             reporter_id, reporter_name, status, partition, is_active, is_matched, match_id, \
             created_at, updated_at, archived_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING *",
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.category)
        .bind(&item.location)
        .bind(item.occurred_at)
        .bind(&item.image_url)
        .bind(item.reporter_id)
        .bind(&item.reporter_name)
        .bind(item.status)
        .bind(item.partition)
        .bind(item.is_active)
        .bind(item.is_matched)
        .bind(item.match_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .bind(item.archived_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create item", e))
    }

    async fn locate(&self, id: ItemId) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    async fn find_in(&self, partition: Partition, id: ItemId) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 AND partition = $2")
            .bind(id)
            .bind(partition)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    async fn find_active(
        &self,
        partition: Partition,
        category: Option<ItemCategory>,
    ) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE partition = $1 AND is_active = TRUE \
             AND ($2::item_category IS NULL OR category = $2) \
             ORDER BY created_at DESC",
        )
        .bind(partition)
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to query items", e))
    }

    async fn delete(&self, partition: Partition, id: ItemId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND partition = $2")
            .bind(id)
            .bind(partition)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete item", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, partition: Partition) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE partition = $1")
            .bind(partition)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count items", e))
    }
}
