//! Item report handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use lostfound_core::types::id::ItemId;
use lostfound_entity::item::Item;
use lostfound_service::item::ItemReport;

use crate::dto::request::ListItemsQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/items
pub async fn report_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ItemReport>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>), ApiError> {
    let item = state.item_service.report_item(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item))))
}

/// GET /api/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let id: ItemId = parse_id(&id)?;
    let item = state.item_service.get_item(id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// GET /api/items?status=&category=
pub async fn list_items(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ApiError> {
    let items = state
        .item_service
        .list_active(query.status, query.category)
        .await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// DELETE /api/items/{id}
pub async fn withdraw_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: ItemId = parse_id(&id)?;
    state.item_service.withdraw_item(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Item withdrawn" } }),
    ))
}
