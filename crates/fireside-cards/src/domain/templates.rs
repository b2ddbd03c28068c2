//! Character-card template records and validation.

use chrono::{DateTime, Utc};
use fireside_core::error::DomainError;
use fireside_core::id::{TemplateId, UserId};
use serde::{Deserialize, Serialize};

/// Maximum length of a template name, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of a sheet-type tag, in characters.
pub const SHEET_TYPE_MAX_CHARS: usize = 32;

/// A reusable character-sheet template owned by a user.
///
/// An empty `sheet_type` means the template is not tied to a rule system.
/// At most one template per owner should carry `is_global_default`, and one
/// per (owner, sheet type) `is_sheet_default`; the application service keeps
/// these exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    /// Template identifier.
    pub id: TemplateId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Rule-system tag, possibly empty.
    pub sheet_type: String,
    /// Template body.
    pub content: String,
    /// Whether this is the owner's default template across all sheets.
    pub is_global_default: bool,
    /// Whether this is the owner's default template for its sheet type.
    pub is_sheet_default: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    /// Display name (required).
    pub name: String,
    /// Rule-system tag (optional).
    #[serde(default)]
    pub sheet_type: String,
    /// Template body (required).
    pub content: String,
    /// Elect as global default on creation.
    #[serde(default)]
    pub is_global_default: bool,
    /// Elect as sheet default on creation.
    #[serde(default)]
    pub is_sheet_default: bool,
}

impl TemplateDraft {
    /// Trims all fields and checks the length limits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the name or content is empty
    /// or a field exceeds its limit.
    pub fn normalize(mut self) -> Result<Self, DomainError> {
        self.name = self.name.trim().to_owned();
        self.sheet_type = self.sheet_type.trim().to_owned();
        self.content = self.content.trim().to_owned();
        validate_name(&self.name)?;
        validate_sheet_type(&self.sheet_type)?;
        validate_content(&self.content)?;
        Ok(self)
    }
}

/// Partial update of a template; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    /// New display name.
    pub name: Option<String>,
    /// New rule-system tag; an empty string clears it.
    pub sheet_type: Option<String>,
    /// New template body.
    pub content: Option<String>,
    /// New global-default flag.
    pub is_global_default: Option<bool>,
    /// New sheet-default flag.
    pub is_sheet_default: Option<bool>,
}

impl TemplatePatch {
    /// Trims the provided fields and checks the length limits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a provided name or content is
    /// empty or a field exceeds its limit.
    pub fn normalize(mut self) -> Result<Self, DomainError> {
        if let Some(name) = self.name {
            let name = name.trim().to_owned();
            validate_name(&name)?;
            self.name = Some(name);
        }
        if let Some(sheet_type) = self.sheet_type {
            let sheet_type = sheet_type.trim().to_owned();
            validate_sheet_type(&sheet_type)?;
            self.sheet_type = Some(sheet_type);
        }
        if let Some(content) = self.content {
            let content = content.trim().to_owned();
            validate_content(&content)?;
            self.content = Some(content);
        }
        Ok(self)
    }
}

/// Scope a template can be elected default for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultScope {
    /// Default across all of the owner's sheets.
    Global,
    /// Default for the template's sheet type.
    Sheet,
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::Validation(
            "template name must not be empty".into(),
        ));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "template name must be at most {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_sheet_type(sheet_type: &str) -> Result<(), DomainError> {
    if sheet_type.chars().count() > SHEET_TYPE_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "sheet type must be at most {SHEET_TYPE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.is_empty() {
        return Err(DomainError::Validation(
            "template content must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_normalize_trims_fields() {
        let draft = TemplateDraft {
            name: "  Investigator  ".into(),
            sheet_type: " coc7 ".into(),
            content: "  str dex pow  ".into(),
            ..TemplateDraft::default()
        };
        let draft = draft.normalize().unwrap();
        assert_eq!(draft.name, "Investigator");
        assert_eq!(draft.sheet_type, "coc7");
        assert_eq!(draft.content, "str dex pow");
    }

    #[test]
    fn test_draft_rejects_blank_name_and_content() {
        let blank_name = TemplateDraft {
            name: "   ".into(),
            content: "x".into(),
            ..TemplateDraft::default()
        };
        assert!(blank_name.normalize().is_err());

        let blank_content = TemplateDraft {
            name: "x".into(),
            content: " ".into(),
            ..TemplateDraft::default()
        };
        assert!(blank_content.normalize().is_err());
    }

    #[test]
    fn test_draft_rejects_overlong_fields() {
        let long_name = TemplateDraft {
            name: "n".repeat(NAME_MAX_CHARS + 1),
            content: "x".into(),
            ..TemplateDraft::default()
        };
        assert!(long_name.normalize().is_err());

        let long_sheet = TemplateDraft {
            name: "x".into(),
            sheet_type: "s".repeat(SHEET_TYPE_MAX_CHARS + 1),
            content: "x".into(),
            ..TemplateDraft::default()
        };
        assert!(long_sheet.normalize().is_err());
    }

    #[test]
    fn test_patch_rejects_blanking_content() {
        let patch = TemplatePatch {
            content: Some("  ".into()),
            ..TemplatePatch::default()
        };
        assert!(patch.normalize().is_err());
    }

    #[test]
    fn test_patch_allows_clearing_sheet_type() {
        let patch = TemplatePatch {
            sheet_type: Some("  ".into()),
            ..TemplatePatch::default()
        };
        let patch = patch.normalize().unwrap();
        assert_eq!(patch.sheet_type.as_deref(), Some(""));
    }
}
