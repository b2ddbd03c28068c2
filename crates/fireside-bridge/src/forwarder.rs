//! Request forwarder.
//!
//! Orchestrates token generation, registration, send, wait-with-timeout and
//! guaranteed cleanup for one outbound bot request. The wait in step 4 is
//! the only suspension point; the registry entry count returns to its
//! pre-call value on every exit path.

use std::sync::Arc;
use std::time::Duration;

use fireside_core::id::ChannelId;
use serde_json::Value;
use tracing::{debug, warn};

use crate::connection::{BotPeer, SendError};
use crate::envelope::{BotFrame, BotReply};
use crate::error::BridgeError;
use crate::locator::ConnectionLocator;
use crate::registry::PendingRegistry;
use crate::token::EchoToken;

/// Sends framed requests and waits for their correlated replies.
pub struct RequestForwarder {
    registry: Arc<PendingRegistry>,
}

impl RequestForwarder {
    /// Creates a forwarder over the shared registry.
    #[must_use]
    pub fn new(registry: Arc<PendingRegistry>) -> Self {
        Self { registry }
    }

    /// Forwards one request to `peer` and blocks the calling task until the
    /// reply arrives or `timeout` elapses.
    ///
    /// The token is registered before the frame is sent, so a reply can never
    /// arrive before its entry exists. A reply arriving after the timeout has
    /// fired is absorbed by the registry and never surfaced.
    ///
    /// # Errors
    ///
    /// [`BridgeError::SendFailure`] when the transport rejects the write,
    /// [`BridgeError::Timeout`] when no reply arrives in time.
    pub async fn forward(
        &self,
        peer: &BotPeer,
        api: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<BotReply, BridgeError> {
        // Token collisions are negligible but not impossible; retry until
        // the registry accepts one.
        let (echo, receiver) = loop {
            let echo = EchoToken::fresh();
            match self.registry.register(echo.clone(), api) {
                Ok(receiver) => break (echo, receiver),
                Err(_already_pending) => {}
            }
        };

        let frame = BotFrame::request(api, echo.clone(), payload);
        let bytes = match serde_json::to_vec(&frame) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.registry.cancel(&echo);
                return Err(BridgeError::SendFailure(SendError(err.to_string())));
            }
        };

        if let Err(err) = peer.connection.send(&bytes).await {
            self.registry.cancel(&echo);
            debug!(echo = %echo, api, connection = %peer.connection.id(), error = %err, "bot send failed");
            return Err(BridgeError::SendFailure(err));
        }

        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(reply)) => {
                self.registry.cancel(&echo);
                Ok(reply)
            }
            // The sender half can only disappear without delivering if the
            // entry was cancelled elsewhere; indistinguishable from a timeout
            // for the caller.
            Ok(Err(_closed)) => {
                self.registry.cancel(&echo);
                Err(BridgeError::Timeout(timeout))
            }
            Err(_elapsed) => {
                self.registry.cancel(&echo);
                warn!(echo = %echo, api, timeout_ms = timeout.as_millis(), "bot request timed out");
                Err(BridgeError::Timeout(timeout))
            }
        }
    }
}

/// Facade consumed by business handlers: resolve a connection, forward the
/// request, surface the reply.
pub struct BotBridge {
    forwarder: RequestForwarder,
    locator: ConnectionLocator,
    default_timeout: Duration,
}

impl BotBridge {
    /// Creates a bridge over the shared registry and locator.
    #[must_use]
    pub fn new(
        registry: Arc<PendingRegistry>,
        locator: ConnectionLocator,
        default_timeout: Duration,
    ) -> Self {
        Self {
            forwarder: RequestForwarder::new(registry),
            locator,
            default_timeout,
        }
    }

    /// Calls an operation scoped to a channel with the default timeout.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NoConnection`] when no eligible session is live (in
    /// that case no pending entry was ever registered), plus the forward
    /// errors.
    pub async fn call_channel(
        &self,
        channel: &ChannelId,
        api: &str,
        payload: Value,
    ) -> Result<BotReply, BridgeError> {
        self.call_channel_with_timeout(channel, api, payload, self.default_timeout)
            .await
    }

    /// Calls an operation scoped to a channel with an explicit timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::call_channel`].
    pub async fn call_channel_with_timeout(
        &self,
        channel: &ChannelId,
        api: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<BotReply, BridgeError> {
        let peer = self
            .locator
            .resolve_for_channel(channel)
            .await
            .ok_or(BridgeError::NoConnection)?;
        self.forwarder.forward(&peer, api, payload, timeout).await
    }

    /// Calls an operation not scoped to a channel with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::call_channel`].
    pub async fn call_any(&self, api: &str, payload: Value) -> Result<BotReply, BridgeError> {
        self.call_any_with_timeout(api, payload, self.default_timeout)
            .await
    }

    /// Calls an operation not scoped to a channel with an explicit timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::call_channel`].
    pub async fn call_any_with_timeout(
        &self,
        api: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<BotReply, BridgeError> {
        let peer = self
            .locator
            .resolve_any()
            .await
            .ok_or(BridgeError::NoConnection)?;
        self.forwarder.forward(&peer, api, payload, timeout).await
    }
}
