//! `PostgreSQL` implementation of the `BindingRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fireside_cards::domain::bindings::{BindingMode, TemplateBinding};
use fireside_cards::repository::BindingRepository;
use fireside_core::error::DomainError;
use fireside_core::id::{BindingId, CardId, ChannelId, TemplateId, UserId};

/// PostgreSQL-backed binding repository.
#[derive(Debug, Clone)]
pub struct PgBindingRepository {
    pool: PgPool,
}

impl PgBindingRepository {
    /// Creates a new `PgBindingRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BindingRow {
    id: Uuid,
    user_id: String,
    channel_id: String,
    external_card_id: String,
    card_name: String,
    sheet_type: String,
    mode: String,
    template_id: Option<Uuid>,
    template_snapshot: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BindingRow> for TemplateBinding {
    type Error = DomainError;

    fn try_from(row: BindingRow) -> Result<Self, DomainError> {
        let mode: BindingMode = row
            .mode
            .parse()
            .map_err(|_| DomainError::Infrastructure(format!("stored mode {:?}", row.mode)))?;
        Ok(Self {
            id: BindingId(row.id),
            user_id: UserId(row.user_id),
            channel_id: ChannelId(row.channel_id),
            external_card_id: CardId(row.external_card_id),
            card_name: row.card_name,
            sheet_type: row.sheet_type,
            mode,
            template_id: row.template_id.map(TemplateId),
            template_snapshot: row.template_snapshot,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn infra(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, channel_id, external_card_id, card_name, \
     sheet_type, mode, template_id, template_snapshot, created_at, updated_at \
     FROM card_template_bindings";

#[async_trait]
impl BindingRepository for PgBindingRepository {
    async fn list(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> Result<Vec<TemplateBinding>, DomainError> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 AND channel_id = $2 ORDER BY updated_at DESC"
        );
        let rows: Vec<BindingRow> = sqlx::query_as(&query)
            .bind(user.as_str())
            .bind(channel.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(infra)?;
        rows.into_iter().map(TemplateBinding::try_from).collect()
    }

    async fn get(
        &self,
        user: &UserId,
        channel: &ChannelId,
        card: &CardId,
    ) -> Result<Option<TemplateBinding>, DomainError> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 AND channel_id = $2 AND external_card_id = $3"
        );
        let row: Option<BindingRow> = sqlx::query_as(&query)
            .bind(user.as_str())
            .bind(channel.as_str())
            .bind(card.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.map(TemplateBinding::try_from).transpose()
    }

    async fn create(&self, binding: &TemplateBinding) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO card_template_bindings \
             (id, user_id, channel_id, external_card_id, card_name, sheet_type, mode, \
              template_id, template_snapshot, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(binding.id.0)
        .bind(binding.user_id.as_str())
        .bind(binding.channel_id.as_str())
        .bind(binding.external_card_id.as_str())
        .bind(&binding.card_name)
        .bind(&binding.sheet_type)
        .bind(binding.mode.to_string())
        .bind(binding.template_id.map(|id| id.0))
        .bind(&binding.template_snapshot)
        .bind(binding.created_at)
        .bind(binding.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }

    async fn update(&self, binding: &TemplateBinding) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE card_template_bindings SET card_name = $2, sheet_type = $3, mode = $4, \
             template_id = $5, template_snapshot = $6, updated_at = $7 \
             WHERE id = $1",
        )
        .bind(binding.id.0)
        .bind(&binding.card_name)
        .bind(&binding.sheet_type)
        .bind(binding.mode.to_string())
        .bind(binding.template_id.map(|id| id.0))
        .bind(&binding.template_snapshot)
        .bind(binding.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("binding {}", binding.id)));
        }
        Ok(())
    }

    async fn detach_by_template(
        &self,
        owner: &UserId,
        template: TemplateId,
        snapshot: &str,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE card_template_bindings \
             SET mode = 'detached', template_id = NULL, template_snapshot = $3 \
             WHERE user_id = $1 AND template_id = $2 AND mode = 'managed'",
        )
        .bind(owner.as_str())
        .bind(template.0)
        .bind(snapshot)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }
}
