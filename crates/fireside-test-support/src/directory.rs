//! Test directories — scripted `ChannelDirectory` and `MembershipGuard`
//! implementations for tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use fireside_bridge::locator::{ChannelDirectory, ChannelInfo};
use fireside_cards::repository::MembershipGuard;
use fireside_core::error::DomainError;
use fireside_core::id::{ChannelId, UserId};

/// A channel directory built up-front by the test and never mutated after.
#[derive(Default)]
pub struct StaticDirectory {
    channels: HashMap<ChannelId, ChannelInfo>,
    grants: HashMap<ChannelId, Vec<UserId>>,
    bots: HashSet<UserId>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a channel.
    pub fn add_channel(&mut self, id: &str, info: ChannelInfo) {
        self.channels.insert(ChannelId::from(id), info);
    }

    /// Grants the channel's bot role to a user.
    pub fn grant_bot_role(&mut self, channel: &str, user: &str) {
        self.grants
            .entry(ChannelId::from(channel))
            .or_default()
            .push(UserId::from(user));
    }

    /// Flags an account as a bot.
    pub fn flag_bot_account(&mut self, user: &str) {
        self.bots.insert(UserId::from(user));
    }
}

#[async_trait]
impl ChannelDirectory for StaticDirectory {
    async fn channel_info(&self, channel: &ChannelId) -> Option<ChannelInfo> {
        self.channels.get(channel).cloned()
    }

    async fn channel_bot_grants(&self, channel: &ChannelId) -> Vec<UserId> {
        self.grants.get(channel).cloned().unwrap_or_default()
    }

    async fn is_bot_account(&self, user: &UserId) -> bool {
        self.bots.contains(user)
    }
}

/// A membership guard that admits everyone.
pub struct OpenMembership;

#[async_trait]
impl MembershipGuard for OpenMembership {
    async fn ensure_member(&self, _user: &UserId, _channel: &ChannelId) -> Result<(), DomainError> {
        Ok(())
    }
}
