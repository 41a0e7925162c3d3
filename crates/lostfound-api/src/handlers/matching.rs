//! Match request and decision handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use lostfound_core::types::id::{ItemId, MatchId};
use lostfound_entity::matching::Match;

use crate::dto::request::ClaimItemRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /api/matches
pub async fn claim_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ClaimItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Match>>), ApiError> {
    let record = state.match_service.claim_item(&auth, req.item_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// GET /api/items/{id}/matches
pub async fn list_for_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Match>>>, ApiError> {
    let id: ItemId = parse_id(&id)?;
    let matches = state.match_service.get_match_requests_for_item(id).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

/// GET /api/items/{id}/matches/pending
///
/// The caller's own open match on the item, or `null`.
pub async fn pending_for_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Option<Match>>>, ApiError> {
    let id: ItemId = parse_id(&id)?;
    let pending = state
        .match_service
        .get_pending_match_for_user(id, auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(pending)))
}

/// POST /api/matches/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Match>>, ApiError> {
    let id: MatchId = parse_id(&id)?;
    let record = state.match_service.approve_match(&auth, id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// POST /api/matches/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Match>>, ApiError> {
    let id: MatchId = parse_id(&id)?;
    let record = state.match_service.reject_match(&auth, id).await?;
    Ok(Json(ApiResponse::ok(record)))
}
