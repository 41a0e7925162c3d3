//! Route definitions for the lost & found HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use lostfound_core::config::ServerConfig;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .merge(item_routes())
        .merge(match_routes())
        .merge(notification_routes())
        .merge(metrics_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(server))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Item reports
fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::item::list_items).post(handlers::item::report_item),
        )
        .route(
            "/items/{id}",
            get(handlers::item::get_item).delete(handlers::item::withdraw_item),
        )
}

/// Match requests and decisions
fn match_routes() -> Router<AppState> {
    Router::new()
        .route("/matches", post(handlers::matching::claim_item))
        .route("/matches/{id}/approve", post(handlers::matching::approve))
        .route("/matches/{id}/reject", post(handlers::matching::reject))
        .route("/items/{id}/matches", get(handlers::matching::list_for_item))
        .route(
            "/items/{id}/matches/pending",
            get(handlers::matching::pending_for_user),
        )
}

/// Notification inbox
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::dismiss),
        )
}

/// Metrics snapshots
fn metrics_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics/recompute", post(handlers::metrics::recompute))
        .route("/metrics/{period}", get(handlers::metrics::snapshot))
}
