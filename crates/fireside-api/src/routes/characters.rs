//! Client-facing character-card passthrough.
//!
//! These endpoints do not touch storage; each forwards to the dice-engine
//! bot that owns the card data and renders the bot's reply. Bridge failures
//! come back as the uniform `ok:false` envelope with HTTP 200 so a missing
//! or slow bot never reads as a server fault.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use fireside_bridge::envelope::BotReply;
use fireside_core::id::ChannelId;

use crate::error::ApiError;
use crate::routes::current_user;
use crate::state::AppState;

/// Operation name for reading a character card.
pub const CHARACTER_GET: &str = "character.get";
/// Operation name for writing character card attributes.
pub const CHARACTER_SET: &str = "character.set";
/// Operation name for listing a user's character cards.
pub const CHARACTER_LIST: &str = "character.list";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBody {
    channel_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetBody {
    channel_id: String,
    name: String,
    #[serde(default)]
    attrs: Map<String, Value>,
}

/// POST /get
async fn get_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GetBody>,
) -> Result<Json<BotReply>, ApiError> {
    let user = current_user(&headers)?;
    let channel = ChannelId::from(body.channel_id);
    let payload = json!({ "group_id": channel.as_str(), "user_id": user.as_str() });

    let reply = state
        .bridge
        .call_channel(&channel, CHARACTER_GET, payload)
        .await
        .unwrap_or_else(|err| err.to_reply());
    Ok(Json(reply))
}

/// POST /set
async fn set_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SetBody>,
) -> Result<Json<BotReply>, ApiError> {
    let user = current_user(&headers)?;
    let channel = ChannelId::from(body.channel_id);
    let payload = json!({
        "group_id": channel.as_str(),
        "user_id": user.as_str(),
        "name": body.name,
        "attrs": body.attrs,
    });

    let reply = state
        .bridge
        .call_channel(&channel, CHARACTER_SET, payload)
        .await
        .unwrap_or_else(|err| err.to_reply());
    Ok(Json(reply))
}

/// POST /list
async fn list_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BotReply>, ApiError> {
    let user = current_user(&headers)?;
    let payload = json!({ "user_id": user.as_str() });

    let reply = state
        .bridge
        .call_any(CHARACTER_LIST, payload)
        .await
        .unwrap_or_else(|err| err.to_reply());
    Ok(Json(reply))
}

/// Returns the router for character passthrough operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get", post(get_card))
        .route("/set", post(set_card))
        .route("/list", post(list_cards))
}
