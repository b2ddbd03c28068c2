//! Routes for per-channel card bindings.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use fireside_cards::domain::bindings::BindingDraft;
use fireside_core::error::DomainError;
use fireside_core::id::ChannelId;

use crate::error::ApiError;
use crate::routes::current_user;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    channel_id: String,
}

/// GET /?channelId=...
async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers)?;
    let channel = query.channel_id.trim();
    if channel.is_empty() {
        return Err(ApiError(DomainError::Validation(
            "channel id is required".into(),
        )));
    }
    let items = state
        .bindings
        .list(&user, &ChannelId::from(channel))
        .await?;
    Ok(Json(json!({ "items": items })))
}

/// PUT /
async fn upsert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<BindingDraft>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers)?;
    let item = state.bindings.upsert(&user, draft).await?;
    Ok(Json(json!({ "item": item })))
}

/// Returns the router for card bindings.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list).put(upsert))
}
