//! Metrics handlers.

use axum::Json;
use axum::extract::{Path, State};

use lostfound_entity::metrics::MetricsSnapshot;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/metrics/recompute
pub async fn recompute(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<MetricsSnapshot>>, ApiError> {
    let snapshot = state.metrics_service.recompute().await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/metrics/{period}
pub async fn snapshot(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(period): Path<String>,
) -> Result<Json<ApiResponse<MetricsSnapshot>>, ApiError> {
    let snapshot = state.metrics_service.snapshot(&period).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}
