//! WebSocket endpoint for dice-engine bot sessions.
//!
//! A bot connects once and the session stays up for its lifetime: outbound
//! requests from the bridge and inbound frames from the bot share the same
//! socket. The read loop feeds every frame to the dispatcher; the write half
//! sits behind a lock so concurrent forwards never interleave partial
//! frames.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use futures_util::SinkExt;
use futures_util::stream::{SplitSink, StreamExt};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use fireside_bridge::connection::{BotConnection, BotPeer, ConnectionId, SendError};
use fireside_core::error::DomainError;
use fireside_core::id::UserId;
use fireside_roster::profile::{BotTokenMeta, sync_bot_profile};

use crate::state::AppState;

/// Connection parameters supplied by the bot.
///
/// Authentication is out of scope; a fronting proxy is expected to have
/// validated the token and passed its metadata along.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectQuery {
    user: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    avatar: String,
    #[serde(default)]
    nick_color: String,
}

/// Write half of a bot WebSocket session.
struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

#[async_trait]
impl BotConnection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, frame: &[u8]) -> Result<(), SendError> {
        let text = std::str::from_utf8(frame)
            .map_err(|err| SendError(format!("frame is not utf-8: {err}")))?;
        self.sink
            .lock()
            .await
            .send(Message::Text(text.to_owned().into()))
            .await
            .map_err(|err| SendError(err.to_string()))
    }
}

/// GET /ws/bot
async fn bot_ws(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_session(state, query, socket))
}

async fn run_session(state: AppState, query: ConnectQuery, socket: WebSocket) {
    let user_id = UserId::from(query.user.trim());
    if user_id.as_str().is_empty() {
        warn!("bot session rejected: missing user id");
        return;
    }

    state.directory.flag_bot_account(user_id.clone());
    let meta = BotTokenMeta {
        user_id: user_id.clone(),
        name: query.name,
        avatar: query.avatar,
        nick_color: query.nick_color,
    };
    match sync_bot_profile(&meta, state.users.as_ref()).await {
        Ok(_) | Err(DomainError::NotFound(_)) => {}
        Err(err) => warn!(user = %user_id, error = %err, "bot profile sync failed"),
    }

    let (sink, mut stream) = socket.split();
    let connection = Arc::new(WsConnection {
        id: ConnectionId::generate(),
        sink: Mutex::new(sink),
    });
    let connection_id = connection.id();
    state.roster.insert(BotPeer {
        connection,
        user_id: user_id.clone(),
    });
    info!(connection = %connection_id, user = %user_id, "bot session connected");

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                state.dispatcher.on_frame(connection_id, text.as_bytes()).await;
            }
            Ok(Message::Binary(bytes)) => {
                state.dispatcher.on_frame(connection_id, &bytes).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(connection = %connection_id, error = %err, "bot socket read failed");
                break;
            }
        }
    }

    state.roster.remove(connection_id);
    info!(connection = %connection_id, user = %user_id, "bot session closed");
}

/// Returns the router for the bot WebSocket endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/ws/bot", get(bot_ws))
}
