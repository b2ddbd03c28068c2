//! Route modules.

use axum::http::HeaderMap;
use fireside_core::error::DomainError;
use fireside_core::id::UserId;

use crate::error::ApiError;

pub mod bindings;
pub mod bot_ws;
pub mod characters;
pub mod health;
pub mod templates;

/// Name of the header carrying the authenticated user id.
///
/// Authentication itself is out of scope; a fronting proxy is expected to
/// strip and re-set this header.
pub const USER_HEADER: &str = "x-user-id";

/// Reads the authenticated user from the request headers.
pub(crate) fn current_user(headers: &HeaderMap) -> Result<UserId, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(UserId::from)
        .ok_or_else(|| ApiError(DomainError::Forbidden("missing x-user-id header".into())))
}
