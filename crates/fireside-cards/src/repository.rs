//! Narrow persistence interfaces for the cards context.

use async_trait::async_trait;
use fireside_core::error::DomainError;
use fireside_core::id::{CardId, ChannelId, TemplateId, UserId};

use crate::domain::bindings::TemplateBinding;
use crate::domain::templates::CardTemplate;

/// Persistence for card templates.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Lists an owner's templates, optionally filtered by sheet type,
    /// defaults first, most recently updated first.
    async fn list(
        &self,
        owner: &UserId,
        sheet_type: Option<&str>,
    ) -> Result<Vec<CardTemplate>, DomainError>;

    /// Loads a template by id.
    async fn get(&self, id: TemplateId) -> Result<Option<CardTemplate>, DomainError>;

    /// Persists a new template.
    async fn create(&self, template: &CardTemplate) -> Result<(), DomainError>;

    /// Replaces a stored template.
    async fn update(&self, template: &CardTemplate) -> Result<(), DomainError>;

    /// Deletes a template by id.
    async fn delete(&self, id: TemplateId) -> Result<(), DomainError>;

    /// Clears the global-default flag on all of `owner`'s templates except
    /// `keep`.
    async fn clear_global_default(
        &self,
        owner: &UserId,
        keep: Option<TemplateId>,
    ) -> Result<(), DomainError>;

    /// Clears the sheet-default flag on all of `owner`'s templates with the
    /// given sheet type except `keep`.
    async fn clear_sheet_default(
        &self,
        owner: &UserId,
        sheet_type: &str,
        keep: Option<TemplateId>,
    ) -> Result<(), DomainError>;
}

/// Persistence for template bindings.
#[async_trait]
pub trait BindingRepository: Send + Sync {
    /// Lists a user's bindings in a channel, most recently updated first.
    async fn list(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> Result<Vec<TemplateBinding>, DomainError>;

    /// Loads a binding by its (user, channel, external card) key.
    async fn get(
        &self,
        user: &UserId,
        channel: &ChannelId,
        card: &CardId,
    ) -> Result<Option<TemplateBinding>, DomainError>;

    /// Persists a new binding.
    async fn create(&self, binding: &TemplateBinding) -> Result<(), DomainError>;

    /// Replaces a stored binding.
    async fn update(&self, binding: &TemplateBinding) -> Result<(), DomainError>;

    /// Detaches every managed binding of `owner` that references `template`:
    /// mode becomes detached, the reference is cleared and `snapshot` is
    /// recorded as the frozen content.
    async fn detach_by_template(
        &self,
        owner: &UserId,
        template: TemplateId,
        snapshot: &str,
    ) -> Result<(), DomainError>;
}

/// Guard answering whether a user may touch a channel's bindings.
#[async_trait]
pub trait MembershipGuard: Send + Sync {
    /// Succeeds iff `user` is a member of `channel`.
    async fn ensure_member(&self, user: &UserId, channel: &ChannelId) -> Result<(), DomainError>;
}
