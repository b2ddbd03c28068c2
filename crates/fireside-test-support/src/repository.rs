//! Test repositories — in-memory implementations of the persistence traits.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fireside_cards::domain::bindings::{BindingMode, TemplateBinding};
use fireside_cards::domain::templates::CardTemplate;
use fireside_cards::repository::{BindingRepository, TemplateRepository};
use fireside_core::error::DomainError;
use fireside_core::id::{BindingId, CardId, ChannelId, TemplateId, UserId};
use fireside_roster::profile::{ProfileUpdate, UserProfile, UserRepository};

/// An in-memory template store.
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: Mutex<Vec<CardTemplate>>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn list(
        &self,
        owner: &UserId,
        sheet_type: Option<&str>,
    ) -> Result<Vec<CardTemplate>, DomainError> {
        let mut items: Vec<CardTemplate> = self
            .templates
            .lock()
            .unwrap()
            .iter()
            .filter(|t| &t.user_id == owner)
            .filter(|t| sheet_type.is_none_or(|s| t.sheet_type == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.is_global_default
                .cmp(&a.is_global_default)
                .then(b.is_sheet_default.cmp(&a.is_sheet_default))
                .then(b.updated_at.cmp(&a.updated_at))
        });
        Ok(items)
    }

    async fn get(&self, id: TemplateId) -> Result<Option<CardTemplate>, DomainError> {
        Ok(self
            .templates
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn create(&self, template: &CardTemplate) -> Result<(), DomainError> {
        self.templates.lock().unwrap().push(template.clone());
        Ok(())
    }

    async fn update(&self, template: &CardTemplate) -> Result<(), DomainError> {
        let mut templates = self.templates.lock().unwrap();
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(stored) => {
                *stored = template.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("template {}", template.id))),
        }
    }

    async fn delete(&self, id: TemplateId) -> Result<(), DomainError> {
        self.templates.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn clear_global_default(
        &self,
        owner: &UserId,
        keep: Option<TemplateId>,
    ) -> Result<(), DomainError> {
        for template in self.templates.lock().unwrap().iter_mut() {
            if &template.user_id == owner && keep != Some(template.id) {
                template.is_global_default = false;
            }
        }
        Ok(())
    }

    async fn clear_sheet_default(
        &self,
        owner: &UserId,
        sheet_type: &str,
        keep: Option<TemplateId>,
    ) -> Result<(), DomainError> {
        for template in self.templates.lock().unwrap().iter_mut() {
            if &template.user_id == owner
                && template.sheet_type == sheet_type
                && keep != Some(template.id)
            {
                template.is_sheet_default = false;
            }
        }
        Ok(())
    }
}

/// An in-memory binding store.
#[derive(Default)]
pub struct InMemoryBindingRepository {
    bindings: Mutex<Vec<TemplateBinding>>,
}

impl InMemoryBindingRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a managed binding referencing `template`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed_managed(&self, owner: &UserId, channel: &str, card: &str, template: TemplateId) {
        let now = Utc::now();
        self.bindings.lock().unwrap().push(TemplateBinding {
            id: BindingId::generate(),
            user_id: owner.clone(),
            channel_id: ChannelId::from(channel),
            external_card_id: CardId::from(card),
            card_name: String::new(),
            sheet_type: String::new(),
            mode: BindingMode::Managed,
            template_id: Some(template),
            template_snapshot: String::new(),
            created_at: now,
            updated_at: now,
        });
    }
}

#[async_trait]
impl BindingRepository for InMemoryBindingRepository {
    async fn list(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> Result<Vec<TemplateBinding>, DomainError> {
        let mut items: Vec<TemplateBinding> = self
            .bindings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| &b.user_id == user && &b.channel_id == channel)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }

    async fn get(
        &self,
        user: &UserId,
        channel: &ChannelId,
        card: &CardId,
    ) -> Result<Option<TemplateBinding>, DomainError> {
        Ok(self
            .bindings
            .lock()
            .unwrap()
            .iter()
            .find(|b| {
                &b.user_id == user && &b.channel_id == channel && &b.external_card_id == card
            })
            .cloned())
    }

    async fn create(&self, binding: &TemplateBinding) -> Result<(), DomainError> {
        self.bindings.lock().unwrap().push(binding.clone());
        Ok(())
    }

    async fn update(&self, binding: &TemplateBinding) -> Result<(), DomainError> {
        let mut bindings = self.bindings.lock().unwrap();
        match bindings.iter_mut().find(|b| b.id == binding.id) {
            Some(stored) => {
                *stored = binding.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("binding {}", binding.id))),
        }
    }

    async fn detach_by_template(
        &self,
        owner: &UserId,
        template: TemplateId,
        snapshot: &str,
    ) -> Result<(), DomainError> {
        for binding in self.bindings.lock().unwrap().iter_mut() {
            if &binding.user_id == owner
                && binding.template_id == Some(template)
                && binding.mode == BindingMode::Managed
            {
                binding.mode = BindingMode::Detached;
                binding.template_id = None;
                binding.template_snapshot = snapshot.to_owned();
            }
        }
        Ok(())
    }
}

/// An in-memory user-profile store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<UserProfile>>,
    updates: Mutex<usize>,
}

impl InMemoryUserRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed(&self, profile: UserProfile) {
        self.users.lock().unwrap().push(profile);
    }

    /// Number of `update_profile` calls observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn update_count(&self) -> usize {
        *self.updates.lock().unwrap()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.user_id == id)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| &u.user_id == id) else {
            return Err(DomainError::NotFound(format!("user {id}")));
        };
        if let Some(nickname) = &update.nickname {
            user.nickname.clone_from(nickname);
        }
        if let Some(avatar) = &update.avatar {
            user.avatar.clone_from(avatar);
        }
        if let Some(nick_color) = &update.nick_color {
            user.nick_color.clone_from(nick_color);
        }
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }
}
