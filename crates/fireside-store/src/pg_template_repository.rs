//! `PostgreSQL` implementation of the `TemplateRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fireside_cards::domain::templates::CardTemplate;
use fireside_cards::repository::TemplateRepository;
use fireside_core::error::DomainError;
use fireside_core::id::{TemplateId, UserId};

/// PostgreSQL-backed template repository.
#[derive(Debug, Clone)]
pub struct PgTemplateRepository {
    pool: PgPool,
}

impl PgTemplateRepository {
    /// Creates a new `PgTemplateRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    user_id: String,
    name: String,
    sheet_type: String,
    content: String,
    is_global_default: bool,
    is_sheet_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TemplateRow> for CardTemplate {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: TemplateId(row.id),
            user_id: UserId(row.user_id),
            name: row.name,
            sheet_type: row.sheet_type,
            content: row.content,
            is_global_default: row.is_global_default,
            is_sheet_default: row.is_sheet_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn infra(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, name, sheet_type, content, \
     is_global_default, is_sheet_default, created_at, updated_at \
     FROM card_templates";

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    async fn list(
        &self,
        owner: &UserId,
        sheet_type: Option<&str>,
    ) -> Result<Vec<CardTemplate>, DomainError> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 AND ($2::text IS NULL OR sheet_type = $2) \
             ORDER BY is_global_default DESC, is_sheet_default DESC, updated_at DESC"
        );
        let rows: Vec<TemplateRow> = sqlx::query_as(&query)
            .bind(owner.as_str())
            .bind(sheet_type)
            .fetch_all(&self.pool)
            .await
            .map_err(infra)?;
        Ok(rows.into_iter().map(CardTemplate::from).collect())
    }

    async fn get(&self, id: TemplateId) -> Result<Option<CardTemplate>, DomainError> {
        let query = format!("{SELECT_COLUMNS} WHERE id = $1");
        let row: Option<TemplateRow> = sqlx::query_as(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        Ok(row.map(CardTemplate::from))
    }

    async fn create(&self, template: &CardTemplate) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO card_templates \
             (id, user_id, name, sheet_type, content, is_global_default, is_sheet_default, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(template.id.0)
        .bind(template.user_id.as_str())
        .bind(&template.name)
        .bind(&template.sheet_type)
        .bind(&template.content)
        .bind(template.is_global_default)
        .bind(template.is_sheet_default)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }

    async fn update(&self, template: &CardTemplate) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE card_templates SET name = $2, sheet_type = $3, content = $4, \
             is_global_default = $5, is_sheet_default = $6, updated_at = $7 \
             WHERE id = $1",
        )
        .bind(template.id.0)
        .bind(&template.name)
        .bind(&template.sheet_type)
        .bind(&template.content)
        .bind(template.is_global_default)
        .bind(template.is_sheet_default)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("template {}", template.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: TemplateId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM card_templates WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(infra)?;
        Ok(())
    }

    async fn clear_global_default(
        &self,
        owner: &UserId,
        keep: Option<TemplateId>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE card_templates SET is_global_default = FALSE \
             WHERE user_id = $1 AND is_global_default AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(owner.as_str())
        .bind(keep.map(|id| id.0))
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }

    async fn clear_sheet_default(
        &self,
        owner: &UserId,
        sheet_type: &str,
        keep: Option<TemplateId>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE card_templates SET is_sheet_default = FALSE \
             WHERE user_id = $1 AND sheet_type = $2 AND is_sheet_default \
             AND ($3::uuid IS NULL OR id <> $3)",
        )
        .bind(owner.as_str())
        .bind(sheet_type)
        .bind(keep.map(|id| id.0))
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }
}
