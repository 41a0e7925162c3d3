//! `AuthUser` extractor: reads the identity forwarded by the upstream
//! authentication proxy and injects a request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lostfound_core::error::AppError;
use lostfound_core::types::id::UserId;
use lostfound_service::context::RequestContext;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Extracted user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing X-User-Id header"))?;

        let user_id: UserId = raw_id
            .trim()
            .parse()
            .map_err(|_| AppError::unauthenticated("Invalid X-User-Id header"))?;

        let display_name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
            .to_string();

        Ok(AuthUser(RequestContext::new(user_id, display_name)))
    }
}
