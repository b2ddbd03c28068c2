//! Template bindings: a user's link between a bot-managed character card in
//! a channel and the template that renders it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use fireside_core::error::DomainError;
use fireside_core::id::{BindingId, CardId, ChannelId, TemplateId, UserId};
use serde::{Deserialize, Serialize};

/// How a binding tracks its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// Follows a template from the owner's library.
    Managed,
    /// Carries its own frozen snapshot of the template content.
    Detached,
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed => f.write_str("managed"),
            Self::Detached => f.write_str("detached"),
        }
    }
}

impl FromStr for BindingMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "managed" => Ok(Self::Managed),
            "detached" => Ok(Self::Detached),
            other => Err(DomainError::Validation(format!(
                "invalid binding mode: {other}"
            ))),
        }
    }
}

/// A per-channel link between an external character card and a template.
///
/// Managed bindings reference a library template and carry no snapshot;
/// detached bindings carry a snapshot and no template reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBinding {
    /// Binding identifier.
    pub id: BindingId,
    /// Owning user.
    pub user_id: UserId,
    /// Channel the card lives in.
    pub channel_id: ChannelId,
    /// Card identifier assigned by the bot.
    pub external_card_id: CardId,
    /// Card display name.
    pub card_name: String,
    /// Rule-system tag, possibly empty.
    pub sheet_type: String,
    /// Tracking mode.
    pub mode: BindingMode,
    /// Referenced template, for managed bindings.
    pub template_id: Option<TemplateId>,
    /// Frozen template content, for detached bindings.
    pub template_snapshot: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a binding, keyed by
/// (user, channel, external card).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingDraft {
    /// Channel the card lives in (required).
    pub channel_id: String,
    /// Card identifier assigned by the bot (required).
    pub external_card_id: String,
    /// Card display name.
    #[serde(default)]
    pub card_name: String,
    /// Rule-system tag; managed bindings inherit the template's when empty.
    #[serde(default)]
    pub sheet_type: String,
    /// Tracking mode; empty defaults to `managed`.
    #[serde(default)]
    pub mode: String,
    /// Referenced template (managed mode).
    #[serde(default)]
    pub template_id: Option<TemplateId>,
    /// Frozen content (detached mode).
    #[serde(default)]
    pub template_snapshot: String,
}

impl BindingDraft {
    /// Trims fields, applies the mode default and checks the mode-specific
    /// requirements.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the channel or card id is
    /// missing, the mode is unknown, a managed draft has no template id, or
    /// a detached draft has no snapshot.
    pub fn normalize(mut self) -> Result<(Self, BindingMode), DomainError> {
        self.channel_id = self.channel_id.trim().to_owned();
        self.external_card_id = self.external_card_id.trim().to_owned();
        self.card_name = self.card_name.trim().to_owned();
        self.sheet_type = self.sheet_type.trim().to_owned();
        self.mode = self.mode.trim().to_owned();
        self.template_snapshot = self.template_snapshot.trim().to_owned();

        if self.channel_id.is_empty() {
            return Err(DomainError::Validation("channel id is required".into()));
        }
        if self.external_card_id.is_empty() {
            return Err(DomainError::Validation("card id is required".into()));
        }

        let mode = if self.mode.is_empty() {
            BindingMode::Managed
        } else {
            self.mode.parse()?
        };
        match mode {
            BindingMode::Managed => {
                if self.template_id.is_none() {
                    return Err(DomainError::Validation(
                        "managed bindings require a template id".into(),
                    ));
                }
            }
            BindingMode::Detached => {
                if self.template_snapshot.is_empty() {
                    return Err(DomainError::Validation(
                        "detached bindings require a template snapshot".into(),
                    ));
                }
            }
        }
        Ok((self, mode))
    }
}
