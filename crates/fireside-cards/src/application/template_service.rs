//! Template CRUD and default election.

use std::sync::Arc;

use fireside_core::clock::Clock;
use fireside_core::error::DomainError;
use fireside_core::id::{TemplateId, UserId};
use tracing::info;

use crate::domain::templates::{CardTemplate, DefaultScope, TemplateDraft, TemplatePatch};
use crate::repository::{BindingRepository, TemplateRepository};

/// Service for a user's template library.
pub struct TemplateService {
    templates: Arc<dyn TemplateRepository>,
    bindings: Arc<dyn BindingRepository>,
    clock: Arc<dyn Clock>,
}

impl TemplateService {
    /// Creates the service over its repositories.
    #[must_use]
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        bindings: Arc<dyn BindingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            templates,
            bindings,
            clock,
        }
    }

    /// Lists `owner`'s templates, optionally filtered by sheet type.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn list(
        &self,
        owner: &UserId,
        sheet_type: Option<&str>,
    ) -> Result<Vec<CardTemplate>, DomainError> {
        let sheet_type = sheet_type.map(str::trim).filter(|s| !s.is_empty());
        self.templates.list(owner, sheet_type).await
    }

    /// Loads a template, enforcing ownership.
    ///
    /// # Errors
    ///
    /// `NotFound` when the template does not exist, `Forbidden` when it is
    /// owned by someone else.
    pub async fn get(&self, owner: &UserId, id: TemplateId) -> Result<CardTemplate, DomainError> {
        let template = self
            .templates
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("template {id}")))?;
        if &template.user_id != owner {
            return Err(DomainError::Forbidden("not the template owner".into()));
        }
        Ok(template)
    }

    /// Creates a template; electing a default clears the previous holder in
    /// the same scope first.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad draft (including a sheet-default election
    /// without a sheet type), plus repository errors.
    pub async fn create(
        &self,
        owner: &UserId,
        draft: TemplateDraft,
    ) -> Result<CardTemplate, DomainError> {
        let draft = draft.normalize()?;
        if draft.is_global_default {
            self.templates.clear_global_default(owner, None).await?;
        }
        if draft.is_sheet_default {
            if draft.sheet_type.is_empty() {
                return Err(DomainError::Validation(
                    "a sheet default requires a sheet type".into(),
                ));
            }
            self.templates
                .clear_sheet_default(owner, &draft.sheet_type, None)
                .await?;
        }

        let now = self.clock.now();
        let template = CardTemplate {
            id: TemplateId::generate(),
            user_id: owner.clone(),
            name: draft.name,
            sheet_type: draft.sheet_type,
            content: draft.content,
            is_global_default: draft.is_global_default,
            is_sheet_default: draft.is_sheet_default,
            created_at: now,
            updated_at: now,
        };
        self.templates.create(&template).await?;
        info!(template = %template.id, user = %owner, "created card template");
        Ok(template)
    }

    /// Applies a partial update.
    ///
    /// Setting a default flag clears the previous holder in that scope.
    /// Changing the sheet type of a template that is its sheet's default
    /// carries the flag to the new sheet type.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad patch, `NotFound`/`Forbidden` from the load,
    /// plus repository errors.
    pub async fn update(
        &self,
        owner: &UserId,
        id: TemplateId,
        patch: TemplatePatch,
    ) -> Result<CardTemplate, DomainError> {
        let patch = patch.normalize()?;
        let mut template = self.get(owner, id).await?;

        let next_sheet_type = patch
            .sheet_type
            .clone()
            .unwrap_or_else(|| template.sheet_type.clone());

        if patch.is_global_default == Some(true) {
            self.templates.clear_global_default(owner, Some(id)).await?;
        }
        if patch.is_sheet_default == Some(true) {
            if next_sheet_type.is_empty() {
                return Err(DomainError::Validation(
                    "a sheet default requires a sheet type".into(),
                ));
            }
            self.templates
                .clear_sheet_default(owner, &next_sheet_type, Some(id))
                .await?;
        }

        // A sheet default keeps its standing when it moves to another sheet
        // type, unless the patch says otherwise.
        let keep_sheet_default =
            patch.sheet_type.is_some() && template.is_sheet_default && !next_sheet_type.is_empty();

        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(content) = patch.content {
            template.content = content;
        }
        template.sheet_type = next_sheet_type;
        if let Some(global) = patch.is_global_default {
            template.is_global_default = global;
        }
        if let Some(sheet) = patch.is_sheet_default {
            template.is_sheet_default = sheet;
        } else if keep_sheet_default {
            template.is_sheet_default = true;
        } else if template.sheet_type.is_empty() {
            template.is_sheet_default = false;
        }
        template.updated_at = self.clock.now();

        self.templates.update(&template).await?;
        Ok(template)
    }

    /// Deletes a template, detaching its managed bindings with the template
    /// content frozen as their snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Forbidden` from the load, plus repository errors.
    pub async fn delete(&self, owner: &UserId, id: TemplateId) -> Result<(), DomainError> {
        let template = self.get(owner, id).await?;
        self.bindings
            .detach_by_template(owner, id, &template.content)
            .await?;
        self.templates.delete(id).await?;
        info!(template = %id, user = %owner, "deleted card template");
        Ok(())
    }

    /// Elects a template as the default for `scope`.
    ///
    /// # Errors
    ///
    /// `Validation` when electing a sheet default on a template without a
    /// sheet type; `NotFound`/`Forbidden` from the load; repository errors.
    pub async fn set_default(
        &self,
        owner: &UserId,
        id: TemplateId,
        scope: DefaultScope,
    ) -> Result<CardTemplate, DomainError> {
        let mut template = self.get(owner, id).await?;
        match scope {
            DefaultScope::Global => {
                self.templates.clear_global_default(owner, Some(id)).await?;
                template.is_global_default = true;
            }
            DefaultScope::Sheet => {
                if template.sheet_type.is_empty() {
                    return Err(DomainError::Validation(
                        "template has no sheet type to be the default for".into(),
                    ));
                }
                self.templates
                    .clear_sheet_default(owner, &template.sheet_type, Some(id))
                    .await?;
                template.is_sheet_default = true;
            }
        }
        template.updated_at = self.clock.now();
        self.templates.update(&template).await?;
        Ok(template)
    }
}
