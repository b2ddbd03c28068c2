//! Response dispatcher.
//!
//! Invoked from each connection's read loop with every inbound frame.
//! Frames whose `api` field is the reserved empty marker are responses and
//! complete the matching registry entry; everything else is a bot-initiated
//! request and is routed to business handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::connection::ConnectionId;
use crate::envelope::{BotFrame, BotReply};
use crate::registry::PendingRegistry;

/// Business-handler seam for bot-initiated requests, outside the bridge core.
#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// Handles one inbound request frame (`api` non-empty).
    async fn handle_request(&self, connection: ConnectionId, frame: BotFrame);
}

/// Classifies inbound frames and routes responses to the registry.
pub struct FrameDispatcher {
    registry: Arc<PendingRegistry>,
    handler: Arc<dyn InboundHandler>,
}

impl FrameDispatcher {
    /// Creates a dispatcher over the shared registry.
    #[must_use]
    pub fn new(registry: Arc<PendingRegistry>, handler: Arc<dyn InboundHandler>) -> Self {
        Self { registry, handler }
    }

    /// Processes one raw inbound frame from `connection`.
    ///
    /// A frame that does not parse as an envelope carries no usable token
    /// and is dropped. A response whose body does not parse becomes a
    /// synthetic failure reply delivered to the waiting caller rather than
    /// a system error. Responses for unknown tokens are expected under
    /// timeout races and are silently discarded.
    pub async fn on_frame(&self, connection: ConnectionId, raw: &[u8]) {
        let frame: BotFrame = match serde_json::from_slice(raw) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(connection = %connection, error = %err, "dropping unparseable bot frame");
                return;
            }
        };

        if frame.is_response() {
            let BotFrame { echo, data, .. } = frame;
            let reply = match serde_json::from_value::<BotReply>(data) {
                Ok(reply) => reply,
                Err(err) => {
                    debug!(echo = %echo, error = %err, "malformed bot response body");
                    BotReply::failure("malformed bot response")
                }
            };
            // Unmatched tokens are a normal outcome of the timeout race.
            let _delivered = self.registry.complete(&echo, reply);
        } else {
            self.handler.handle_request(connection, frame).await;
        }
    }
}

// Unit tests for this module live in `tests/dispatcher_test.rs`. They drive the
// dispatcher through the shared `fireside-test-support` mocks, which depend back
// on this crate; keeping them as an integration test avoids the dev-dependency
// cycle that would otherwise compile two versions of this crate.
