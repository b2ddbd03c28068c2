//! Connection locator.
//!
//! Resolves which live duplex session should receive a request. Channel
//! eligibility comes from a [`ChannelDirectory`]; liveness comes from the
//! [`ConnectionRoster`]. Both change concurrently with a lookup, so a
//! resolution can only ever promise a handle that was live at the time it
//! was returned.

use std::sync::Arc;

use async_trait::async_trait;
use fireside_core::id::{ChannelId, UserId};
use tracing::debug;

use crate::connection::{BotPeer, ConnectionRoster};

/// Routing-relevant shape of a channel.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    /// Parent channel, when this is a sub-channel.
    pub parent_id: Option<ChannelId>,
    /// The two participants, when this is a direct-message channel.
    pub private_members: Option<(UserId, UserId)>,
    /// Whether bot interactions are enabled for the channel.
    pub bot_feature_enabled: bool,
}

/// Directory answering channel-eligibility questions for routing.
///
/// Implementations answer from in-memory state; a lookup must never perform
/// blocking I/O.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Shape of the channel, or `None` when the channel is unknown.
    async fn channel_info(&self, channel: &ChannelId) -> Option<ChannelInfo>;

    /// Accounts granted the bot role for the channel.
    async fn channel_bot_grants(&self, channel: &ChannelId) -> Vec<UserId>;

    /// Whether the account is flagged as a bot.
    async fn is_bot_account(&self, user: &UserId) -> bool;
}

/// Resolves live bot sessions for outbound requests.
pub struct ConnectionLocator {
    roster: Arc<ConnectionRoster>,
    directory: Arc<dyn ChannelDirectory>,
}

impl ConnectionLocator {
    /// Creates a locator over a roster and a channel directory.
    #[must_use]
    pub fn new(roster: Arc<ConnectionRoster>, directory: Arc<dyn ChannelDirectory>) -> Self {
        Self { roster, directory }
    }

    /// Resolves a live session for requests scoped to `channel`.
    ///
    /// Candidates, in preference order: accounts holding the channel's bot
    /// role grant; for a direct-message channel, a participant flagged as a
    /// bot account; for a sub-channel, accounts granted the bot role on the
    /// parent. The first candidate with a live session wins. An unknown
    /// channel, or one with the bot feature disabled, resolves to `None`.
    pub async fn resolve_for_channel(&self, channel: &ChannelId) -> Option<BotPeer> {
        let info = self.directory.channel_info(channel).await?;
        if !info.bot_feature_enabled {
            debug!(channel = %channel, "bot feature disabled for channel");
            return None;
        }

        let mut candidates = self.directory.channel_bot_grants(channel).await;
        if let Some((first, second)) = info.private_members {
            for member in [first, second] {
                if self.directory.is_bot_account(&member).await {
                    candidates.push(member);
                }
            }
        } else if let Some(parent) = info.parent_id {
            candidates.extend(self.directory.channel_bot_grants(&parent).await);
        }

        for user in candidates {
            if let Some(peer) = self.roster.find_by_user(&user) {
                return Some(peer);
            }
        }
        debug!(channel = %channel, "no live bot session for channel");
        None
    }

    /// Resolves any live session of a bot account, for operations not scoped
    /// to a channel.
    pub async fn resolve_any(&self) -> Option<BotPeer> {
        for peer in self.roster.snapshot() {
            if self.directory.is_bot_account(&peer.user_id).await {
                return Some(peer);
            }
        }
        None
    }
}

// Unit tests for this module live in `tests/locator_test.rs`. They drive the
// locator through the shared `fireside-test-support` mocks, which depend back
// on this crate; keeping them as an integration test avoids the dev-dependency
// cycle that would otherwise compile two versions of this crate.
