//! Inbound request handling beyond the bridge core.

use async_trait::async_trait;
use fireside_bridge::connection::ConnectionId;
use fireside_bridge::dispatcher::InboundHandler;
use fireside_bridge::envelope::BotFrame;
use tracing::warn;

/// Logs bot-initiated requests.
///
/// Business handlers for bot-initiated operations (messages, rolls) live
/// outside this service; until one is wired in, inbound requests are only
/// recorded.
pub struct InboundRequestLog;

#[async_trait]
impl InboundHandler for InboundRequestLog {
    async fn handle_request(&self, connection: ConnectionId, frame: BotFrame) {
        warn!(
            connection = %connection,
            api = frame.api,
            echo = %frame.echo,
            "unhandled bot-initiated request"
        );
    }
}
