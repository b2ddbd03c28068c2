//! Binding listing and upsert.

use std::sync::Arc;

use fireside_core::clock::Clock;
use fireside_core::error::DomainError;
use fireside_core::id::{BindingId, CardId, ChannelId, UserId};
use tracing::info;

use crate::domain::bindings::{BindingDraft, BindingMode, TemplateBinding};
use crate::repository::{BindingRepository, MembershipGuard, TemplateRepository};

/// Service for a user's per-channel card bindings.
pub struct BindingService {
    bindings: Arc<dyn BindingRepository>,
    templates: Arc<dyn TemplateRepository>,
    guard: Arc<dyn MembershipGuard>,
    clock: Arc<dyn Clock>,
}

impl BindingService {
    /// Creates the service over its repositories and membership guard.
    #[must_use]
    pub fn new(
        bindings: Arc<dyn BindingRepository>,
        templates: Arc<dyn TemplateRepository>,
        guard: Arc<dyn MembershipGuard>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bindings,
            templates,
            guard,
            clock,
        }
    }

    /// Lists `user`'s bindings in `channel`.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the user is not a channel member, plus repository
    /// errors.
    pub async fn list(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> Result<Vec<TemplateBinding>, DomainError> {
        self.guard.ensure_member(user, channel).await?;
        self.bindings.list(user, channel).await
    }

    /// Creates or replaces the binding keyed by the draft's
    /// (user, channel, external card).
    ///
    /// Managed drafts must reference an existing template owned by `user`;
    /// the sheet type is inherited from the template when absent and any
    /// stale snapshot is discarded. Detached drafts keep their snapshot and
    /// no template reference.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad draft, `Forbidden` for non-members or foreign
    /// templates, `NotFound` for a missing template, plus repository errors.
    pub async fn upsert(
        &self,
        user: &UserId,
        draft: BindingDraft,
    ) -> Result<TemplateBinding, DomainError> {
        let (mut draft, mode) = draft.normalize()?;
        let channel = ChannelId::from(draft.channel_id.clone());
        let card = CardId::from(draft.external_card_id.clone());
        self.guard.ensure_member(user, &channel).await?;

        let mut template_id = draft.template_id;
        if mode == BindingMode::Managed {
            // normalize() guarantees a template id in managed mode.
            let Some(id) = template_id else {
                return Err(DomainError::Validation(
                    "managed bindings require a template id".into(),
                ));
            };
            let template = self
                .templates
                .get(id)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("template {id}")))?;
            if &template.user_id != user {
                return Err(DomainError::Forbidden("not the template owner".into()));
            }
            if draft.sheet_type.is_empty() {
                draft.sheet_type = template.sheet_type;
            }
            draft.template_snapshot = String::new();
        } else {
            template_id = None;
        }

        let now = self.clock.now();
        let binding = match self.bindings.get(user, &channel, &card).await? {
            Some(mut existing) => {
                existing.card_name = draft.card_name;
                existing.sheet_type = draft.sheet_type;
                existing.mode = mode;
                existing.template_id = template_id;
                existing.template_snapshot = draft.template_snapshot;
                existing.updated_at = now;
                self.bindings.update(&existing).await?;
                existing
            }
            None => {
                let binding = TemplateBinding {
                    id: BindingId::generate(),
                    user_id: user.clone(),
                    channel_id: channel,
                    external_card_id: card,
                    card_name: draft.card_name,
                    sheet_type: draft.sheet_type,
                    mode,
                    template_id,
                    template_snapshot: draft.template_snapshot,
                    created_at: now,
                    updated_at: now,
                };
                self.bindings.create(&binding).await?;
                binding
            }
        };
        info!(
            binding = %binding.id,
            user = %user,
            channel = %binding.channel_id,
            mode = %binding.mode,
            "upserted card binding"
        );
        Ok(binding)
    }
}

// Unit tests for this module live in `tests/binding_service_test.rs`. They drive
// the service through the shared `fireside-test-support` mocks, which depend
// back on this crate; keeping them as an integration test avoids the
// dev-dependency cycle that would otherwise compile two versions of this crate.
