//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use lostfound_service::item::ItemService;
use lostfound_service::matching::MatchLifecycleService;
use lostfound_service::metrics::MetricsService;
use lostfound_service::notification::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Item report submission and lookup
    pub item_service: Arc<ItemService>,
    /// Match request and decision handling
    pub match_service: Arc<MatchLifecycleService>,
    /// Notification inbox
    pub notification_service: Arc<NotificationService>,
    /// Metrics snapshots
    pub metrics_service: Arc<MetricsService>,
    /// When the process started serving
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state from fully constructed services.
    pub fn new(
        item_service: Arc<ItemService>,
        match_service: Arc<MatchLifecycleService>,
        notification_service: Arc<NotificationService>,
        metrics_service: Arc<MetricsService>,
    ) -> Self {
        Self {
            item_service,
            match_service,
            notification_service,
            metrics_service,
            started_at: Instant::now(),
        }
    }
}
