//! Database schema.

use fireside_core::error::DomainError;
use sqlx::PgPool;

/// SQL to create the template table.
pub const CREATE_TEMPLATES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS card_templates (
    id                UUID PRIMARY KEY,
    user_id           VARCHAR(100) NOT NULL,
    name              VARCHAR(100) NOT NULL,
    sheet_type        VARCHAR(32) NOT NULL DEFAULT '',
    content           TEXT NOT NULL,
    is_global_default BOOLEAN NOT NULL DEFAULT FALSE,
    is_sheet_default  BOOLEAN NOT NULL DEFAULT FALSE,
    created_at        TIMESTAMPTZ NOT NULL,
    updated_at        TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_card_templates_user_sheet
    ON card_templates (user_id, sheet_type);
";

/// SQL to create the binding table.
pub const CREATE_BINDINGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS card_template_bindings (
    id                UUID PRIMARY KEY,
    user_id           VARCHAR(100) NOT NULL,
    channel_id        VARCHAR(100) NOT NULL,
    external_card_id  VARCHAR(100) NOT NULL,
    card_name         VARCHAR(64) NOT NULL DEFAULT '',
    sheet_type        VARCHAR(32) NOT NULL DEFAULT '',
    mode              VARCHAR(16) NOT NULL,
    template_id       UUID,
    template_snapshot TEXT NOT NULL DEFAULT '',
    created_at        TIMESTAMPTZ NOT NULL,
    updated_at        TIMESTAMPTZ NOT NULL,
    UNIQUE (user_id, channel_id, external_card_id)
);

CREATE INDEX IF NOT EXISTS idx_card_template_bindings_template_id
    ON card_template_bindings (template_id);
";

/// SQL to create the user-profile table.
pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id         VARCHAR(100) PRIMARY KEY,
    nickname   VARCHAR(100) NOT NULL DEFAULT '',
    avatar     TEXT NOT NULL DEFAULT '',
    nick_color VARCHAR(32) NOT NULL DEFAULT '',
    is_bot     BOOLEAN NOT NULL DEFAULT FALSE
);
";

/// Creates all tables if they do not exist yet.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` when a statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    for ddl in [
        CREATE_TEMPLATES_TABLE,
        CREATE_BINDINGS_TABLE,
        CREATE_USERS_TABLE,
    ] {
        sqlx::raw_sql(ddl)
            .execute(pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("schema creation failed: {e}")))?;
    }
    Ok(())
}
