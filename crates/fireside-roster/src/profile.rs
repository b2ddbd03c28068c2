//! Bot profile synchronization.
//!
//! A bot authenticates with a token whose metadata (display name, avatar,
//! nickname color) may drift from the bot's public user profile; this module
//! realigns the profile, touching only the fields that actually changed.

use async_trait::async_trait;
use fireside_core::error::DomainError;
use fireside_core::id::UserId;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Public profile of a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account identifier.
    pub user_id: UserId,
    /// Display name.
    pub nickname: String,
    /// Avatar URL, possibly empty.
    pub avatar: String,
    /// Nickname color, possibly empty.
    pub nick_color: String,
    /// Whether the account is a bot.
    pub is_bot: bool,
}

/// Metadata carried by a bot's access token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotTokenMeta {
    /// The bot account the token belongs to.
    pub user_id: UserId,
    /// Display name on the token.
    #[serde(default)]
    pub name: String,
    /// Avatar URL on the token.
    #[serde(default)]
    pub avatar: String,
    /// Nickname color on the token.
    #[serde(default)]
    pub nick_color: String,
}

/// Fields of a profile to overwrite; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name.
    pub nickname: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// New nickname color.
    pub nick_color: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update touches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.avatar.is_none() && self.nick_color.is_none()
    }
}

/// Persistence for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Loads a profile by account id.
    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Applies a partial profile update.
    async fn update_profile(&self, id: &UserId, update: &ProfileUpdate)
    -> Result<(), DomainError>;
}

/// Aligns the bot user's public profile with its token metadata.
///
/// Token fields are trimmed; empty fields and fields already matching the
/// profile are skipped. Returns whether anything was written.
///
/// # Errors
///
/// `NotFound` when the bot user does not exist, plus repository errors. A
/// token without a user id is a no-op.
pub async fn sync_bot_profile(
    meta: &BotTokenMeta,
    users: &dyn UserRepository,
) -> Result<bool, DomainError> {
    if meta.user_id.as_str().is_empty() {
        return Ok(false);
    }
    let profile = users
        .get(&meta.user_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("bot user {}", meta.user_id)))?;

    let mut update = ProfileUpdate::default();
    let name = meta.name.trim();
    if !name.is_empty() && profile.nickname != name {
        update.nickname = Some(name.to_owned());
    }
    let avatar = meta.avatar.trim();
    if !avatar.is_empty() && profile.avatar != avatar {
        update.avatar = Some(avatar.to_owned());
    }
    let nick_color = meta.nick_color.trim();
    if !nick_color.is_empty() && profile.nick_color != nick_color {
        update.nick_color = Some(nick_color.to_owned());
    }

    if update.is_empty() {
        return Ok(false);
    }
    users.update_profile(&meta.user_id, &update).await?;
    info!(user = %meta.user_id, "synchronized bot profile from token metadata");
    Ok(true)
}

// Unit tests for this module live in `tests/profile_test.rs`. They exercise
// `sync_bot_profile` through the shared `fireside-test-support` mocks, which
// depend back on this crate; keeping them as an integration test avoids the
// dev-dependency cycle that would otherwise compile two versions of this crate.
