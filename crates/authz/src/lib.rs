//! Caller identity for HTTP handlers.
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user in the `x-user-id` header. Handlers take an [`AuthUser`] and never see
//! requests without one.

use axum::{extract::FromRequestParts, http::request::Parts};
use shelf_http::AppError;

/// Header carrying the authenticated user's identifier.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match user_id {
            Some(user_id) => Ok(AuthUser(user_id.to_string())),
            None => {
                tracing::debug!(path = %parts.uri.path(), "request without caller identity");
                Err(AppError::unauthorized("authentication required"))
            }
        }
    }
}
