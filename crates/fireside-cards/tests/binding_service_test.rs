//! Binding service tests.
//!
//! Relocated from an in-crate `#[cfg(test)] mod tests` to an integration test
//! so the shared `fireside-test-support` mocks (which depend back on this
//! crate) can be used without creating a dev-dependency cycle that would
//! compile two incompatible versions of this crate.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use fireside_core::error::DomainError;
use fireside_core::id::{ChannelId, TemplateId, UserId};

use fireside_cards::application::binding_service::BindingService;
use fireside_cards::domain::bindings::{BindingDraft, BindingMode};
use fireside_cards::domain::templates::{CardTemplate, TemplateDraft};
use fireside_cards::repository::{BindingRepository, TemplateRepository};
use fireside_test_support::{
    FixedClock, InMemoryBindingRepository, InMemoryTemplateRepository, OpenMembership,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
}

fn service() -> (Arc<InMemoryTemplateRepository>, BindingService) {
    let templates = Arc::new(InMemoryTemplateRepository::new());
    let bindings = Arc::new(InMemoryBindingRepository::new());
    let service = BindingService::new(
        bindings as Arc<dyn BindingRepository>,
        Arc::clone(&templates) as Arc<dyn TemplateRepository>,
        Arc::new(OpenMembership),
        Arc::new(FixedClock(now())),
    );
    (templates, service)
}

async fn seed_template(templates: &InMemoryTemplateRepository, owner: &UserId) -> CardTemplate {
    let draft = TemplateDraft {
        name: "Investigator".into(),
        sheet_type: "coc7".into(),
        content: "str dex pow".into(),
        ..TemplateDraft::default()
    };
    let template = CardTemplate {
        id: TemplateId::generate(),
        user_id: owner.clone(),
        name: draft.name,
        sheet_type: draft.sheet_type,
        content: draft.content,
        is_global_default: false,
        is_sheet_default: false,
        created_at: now(),
        updated_at: now(),
    };
    templates.create(&template).await.unwrap();
    template
}

fn managed_draft(template: TemplateId) -> BindingDraft {
    BindingDraft {
        channel_id: "ch-1".into(),
        external_card_id: "card-1".into(),
        card_name: "Alice".into(),
        template_id: Some(template),
        ..BindingDraft::default()
    }
}

#[tokio::test]
async fn test_managed_upsert_inherits_sheet_type_and_drops_snapshot() {
    let (templates, service) = service();
    let user = UserId::from("u-1");
    let template = seed_template(&templates, &user).await;

    let mut draft = managed_draft(template.id);
    draft.template_snapshot = "stale".into();
    let binding = service.upsert(&user, draft).await.unwrap();

    assert_eq!(binding.mode, BindingMode::Managed);
    assert_eq!(binding.sheet_type, "coc7");
    assert_eq!(binding.template_id, Some(template.id));
    assert!(binding.template_snapshot.is_empty());
}

#[tokio::test]
async fn test_managed_upsert_rejects_foreign_template() {
    let (templates, service) = service();
    let template = seed_template(&templates, &UserId::from("someone-else")).await;

    let result = service
        .upsert(&UserId::from("u-1"), managed_draft(template.id))
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden(_))));
}

#[tokio::test]
async fn test_managed_upsert_rejects_missing_template() {
    let (_, service) = service();
    let result = service
        .upsert(&UserId::from("u-1"), managed_draft(TemplateId::generate()))
        .await;
    assert!(matches!(result, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_upsert_replaces_existing_binding_for_same_card() {
    let (templates, service) = service();
    let user = UserId::from("u-1");
    let template = seed_template(&templates, &user).await;

    let first = service
        .upsert(&user, managed_draft(template.id))
        .await
        .unwrap();

    let mut detached = managed_draft(template.id);
    detached.mode = "detached".into();
    detached.template_id = None;
    detached.template_snapshot = "frozen content".into();
    let second = service.upsert(&user, detached).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.mode, BindingMode::Detached);
    assert!(second.template_id.is_none());
    assert_eq!(second.template_snapshot, "frozen content");

    let listed = service
        .list(&user, &ChannelId::from("ch-1"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}
