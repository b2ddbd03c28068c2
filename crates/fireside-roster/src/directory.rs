//! In-memory channel/member directory.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use fireside_bridge::locator::{ChannelDirectory, ChannelInfo};
use fireside_cards::repository::MembershipGuard;
use fireside_core::error::DomainError;
use fireside_core::id::{ChannelId, UserId};
use tracing::debug;

/// Routing-relevant shape of a channel, as registered by the chat layer.
#[derive(Debug, Clone)]
pub struct ChannelRecord {
    /// Parent channel, when this is a sub-channel.
    pub parent_id: Option<ChannelId>,
    /// The two participants, when this is a direct-message channel.
    pub private_members: Option<(UserId, UserId)>,
    /// Whether bot interactions are enabled for the channel.
    pub bot_feature_enabled: bool,
}

impl ChannelRecord {
    /// An ordinary top-level channel with bots enabled.
    #[must_use]
    pub fn open() -> Self {
        Self {
            parent_id: None,
            private_members: None,
            bot_feature_enabled: true,
        }
    }

    /// A sub-channel of `parent` with bots enabled.
    #[must_use]
    pub fn sub_channel_of(parent: ChannelId) -> Self {
        Self {
            parent_id: Some(parent),
            private_members: None,
            bot_feature_enabled: true,
        }
    }

    /// A direct-message channel between two users.
    #[must_use]
    pub fn direct_message(first: UserId, second: UserId) -> Self {
        Self {
            parent_id: None,
            private_members: Some((first, second)),
            bot_feature_enabled: true,
        }
    }
}

/// Concurrent in-memory directory of channels, members, bot-role grants and
/// bot-account flags.
///
/// The chat layer mutates it as channels and memberships change; the bridge
/// locator and the cards services only read, so every answer reflects some
/// recent consistent state without blocking on I/O.
#[derive(Default)]
pub struct MemberDirectory {
    channels: DashMap<ChannelId, ChannelRecord>,
    members: DashMap<ChannelId, HashSet<UserId>>,
    bot_grants: DashMap<ChannelId, Vec<UserId>>,
    bot_accounts: DashSet<UserId>,
}

impl MemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a channel.
    pub fn upsert_channel(&self, id: ChannelId, record: ChannelRecord) {
        self.channels.insert(id, record);
    }

    /// Removes a channel and its memberships and grants.
    pub fn remove_channel(&self, id: &ChannelId) {
        self.channels.remove(id);
        self.members.remove(id);
        self.bot_grants.remove(id);
    }

    /// Adds a member to a channel.
    pub fn add_member(&self, channel: &ChannelId, user: UserId) {
        self.members.entry(channel.clone()).or_default().insert(user);
    }

    /// Removes a member from a channel.
    pub fn remove_member(&self, channel: &ChannelId, user: &UserId) {
        if let Some(mut members) = self.members.get_mut(channel) {
            members.remove(user);
        }
    }

    /// Grants the channel's bot role to a user.
    pub fn grant_bot_role(&self, channel: &ChannelId, user: UserId) {
        let mut grants = self.bot_grants.entry(channel.clone()).or_default();
        if !grants.contains(&user) {
            debug!(channel = %channel, user = %user, "granted bot role");
            grants.push(user);
        }
    }

    /// Revokes the channel's bot role from a user.
    pub fn revoke_bot_role(&self, channel: &ChannelId, user: &UserId) {
        if let Some(mut grants) = self.bot_grants.get_mut(channel) {
            grants.retain(|granted| granted != user);
        }
    }

    /// Flags an account as a bot.
    pub fn flag_bot_account(&self, user: UserId) {
        self.bot_accounts.insert(user);
    }

    /// Whether `user` is a member of `channel`, counting direct-message
    /// participants.
    #[must_use]
    pub fn is_member(&self, user: &UserId, channel: &ChannelId) -> bool {
        if let Some(record) = self.channels.get(channel)
            && let Some((first, second)) = &record.private_members
            && (first == user || second == user)
        {
            return true;
        }
        self.members
            .get(channel)
            .is_some_and(|members| members.contains(user))
    }
}

#[async_trait]
impl ChannelDirectory for MemberDirectory {
    async fn channel_info(&self, channel: &ChannelId) -> Option<ChannelInfo> {
        self.channels.get(channel).map(|record| ChannelInfo {
            parent_id: record.parent_id.clone(),
            private_members: record.private_members.clone(),
            bot_feature_enabled: record.bot_feature_enabled,
        })
    }

    async fn channel_bot_grants(&self, channel: &ChannelId) -> Vec<UserId> {
        self.bot_grants
            .get(channel)
            .map(|grants| grants.clone())
            .unwrap_or_default()
    }

    async fn is_bot_account(&self, user: &UserId) -> bool {
        self.bot_accounts.contains(user)
    }
}

#[async_trait]
impl MembershipGuard for MemberDirectory {
    async fn ensure_member(&self, user: &UserId, channel: &ChannelId) -> Result<(), DomainError> {
        if self.is_member(user, channel) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "user {user} is not a member of channel {channel}"
            )))
        }
    }
}
