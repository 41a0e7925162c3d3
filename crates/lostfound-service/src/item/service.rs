//! Item report service: submission, lookup, listing and withdrawal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use lostfound_core::error::AppError;
use lostfound_core::result::AppResult;
use lostfound_core::types::id::ItemId;
use lostfound_database::store::ItemStore;
use lostfound_entity::item::{
    Item, ItemCategory, ItemReported, ItemStatus, NewItem, Partition,
};

use crate::context::RequestContext;
use crate::events::EventBus;
use crate::matching::CandidateMatcher;
use crate::metrics::MetricsService;

/// A lost or found report as submitted by a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemReport {
    /// Short title.
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: String,
    /// Item category.
    pub category: ItemCategory,
    /// Where it was lost or found.
    #[validate(length(min = 1, max = 200, message = "Location must be 1-200 characters"))]
    pub location: String,
    /// When it was lost or found.
    pub occurred_at: DateTime<Utc>,
    /// Reference to an uploaded image.
    #[serde(default)]
    #[validate(url(message = "Image reference must be a URL"))]
    pub image_url: Option<String>,
    /// Lost or found.
    pub status: ItemStatus,
}

/// Handles item report submission and lookups.
#[derive(Debug, Clone)]
pub struct ItemService {
    /// Item store.
    items: Arc<dyn ItemStore>,
    /// Metrics refreshed after each submission.
    metrics: Arc<MetricsService>,
    /// Event bus feeding the matcher trigger.
    events: EventBus,
    /// Runs in the request when the trigger no longer consumes events.
    matcher: Arc<CandidateMatcher>,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(
        items: Arc<dyn ItemStore>,
        metrics: Arc<MetricsService>,
        events: EventBus,
        matcher: Arc<CandidateMatcher>,
    ) -> Self {
        Self {
            items,
            metrics,
            events,
            matcher,
        }
    }

    /// Validates and stores a new report, then hands it to the matcher.
    pub async fn report_item(&self, ctx: &RequestContext, report: ItemReport) -> AppResult<Item> {
        report
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid item report: {e}")))?;
        if report.title.trim().is_empty() || report.location.trim().is_empty() {
            return Err(AppError::validation("Title and location must not be blank"));
        }

        let item = self
            .items
            .insert(&Item::from_new(NewItem {
                title: report.title.trim().to_string(),
                description: report.description,
                category: report.category,
                location: report.location.trim().to_string(),
                occurred_at: report.occurred_at,
                image_url: report.image_url,
                status: report.status,
                reporter_id: ctx.user_id,
                reporter_name: ctx.display_name.clone(),
            }))
            .await?;

        info!(
            item_id = %item.id,
            partition = %item.partition,
            category = %item.category,
            reporter_id = %item.reporter_id,
            "Item reported"
        );

        let event = ItemReported::new(item.clone());
        if let Err(e) = self.events.publish(event.clone()).await {
            warn!(item_id = %item.id, error = %e, "Item event not accepted, matching inline");
            if let Err(e) = self.matcher.on_item_reported(&event).await {
                error!(item_id = %item.id, error = %e, "Inline candidate matching failed");
            }
        }

        if let Err(e) = self.metrics.recompute().await {
            warn!(item_id = %item.id, error = %e, "Metrics refresh after report failed");
        }

        Ok(item)
    }

    /// Gets an item by id, from whichever partition holds it.
    pub async fn get_item(&self, item_id: ItemId) -> AppResult<Item> {
        self.items
            .locate(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found")))
    }

    /// Active reports of `status`, newest first.
    pub async fn list_active(
        &self,
        status: ItemStatus,
        category: Option<ItemCategory>,
    ) -> AppResult<Vec<Item>> {
        self.items
            .find_active(Partition::for_status(status), category)
            .await
    }

    /// Deletes the current user's active report.
    pub async fn withdraw_item(&self, ctx: &RequestContext, item_id: ItemId) -> AppResult<()> {
        let item = self.get_item(item_id).await?;

        if item.reporter_id != ctx.user_id {
            return Err(AppError::authorization(
                "Only the reporter can withdraw this item",
            ));
        }
        if !item.partition.is_source() {
            return Err(AppError::invalid_state(format!(
                "Item {item_id} has already been matched"
            )));
        }

        if !self.items.delete(item.partition, item_id).await? {
            return Err(AppError::not_found(format!("Item {item_id} not found")));
        }

        info!(item_id = %item_id, partition = %item.partition, "Item withdrawn");
        Ok(())
    }
}
