//! `PostgreSQL` implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use fireside_core::error::DomainError;
use fireside_core::id::UserId;
use fireside_roster::profile::{ProfileUpdate, UserProfile, UserRepository};

/// PostgreSQL-backed user-profile repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a new `PgUserRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    nickname: String,
    avatar: String,
    nick_color: String,
    is_bot: bool,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: UserId(row.id),
            nickname: row.nickname,
            avatar: row.avatar,
            nick_color: row.nick_color,
            is_bot: row.is_bot,
        }
    }
}

fn infra(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, nickname, avatar, nick_color, is_bot FROM users WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(infra)?;
        Ok(row.map(UserProfile::from))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET nickname = COALESCE($2, nickname), \
             avatar = COALESCE($3, avatar), nick_color = COALESCE($4, nick_color) \
             WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(update.nickname.as_deref())
        .bind(update.avatar.as_deref())
        .bind(update.nick_color.as_deref())
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("user {id}")));
        }
        Ok(())
    }
}
