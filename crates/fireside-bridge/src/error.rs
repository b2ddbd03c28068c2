//! Bridge error taxonomy.
//!
//! Only three kinds ever surface to a caller. A response body that fails to
//! parse becomes a synthetic failure reply delivered through the normal
//! completion path, and a response for an unknown token is silently dropped;
//! neither is an error here.

use std::time::Duration;

use thiserror::Error;

use crate::connection::SendError;
use crate::envelope::BotReply;

/// Errors surfaced by a bridge call.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No eligible bot connection is live.
    #[error("no bot connection available")]
    NoConnection,

    /// The transport rejected the outbound write.
    #[error("failed to send request to bot: {0}")]
    SendFailure(#[from] SendError),

    /// The bot did not reply within the configured window.
    #[error("bot did not reply within {0:?}")]
    Timeout(Duration),
}

impl BridgeError {
    /// Renders this error as the uniform failure envelope presented to the
    /// original requester, so a bridge failure never aborts the enclosing
    /// connection.
    #[must_use]
    pub fn to_reply(&self) -> BotReply {
        BotReply::failure(self.to_string())
    }
}
