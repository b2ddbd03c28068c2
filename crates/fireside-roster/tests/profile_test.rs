//! Bot profile synchronization tests.
//!
//! Relocated from an in-crate `#[cfg(test)] mod tests` to an integration test
//! so the shared `fireside-test-support` mocks (which depend back on this
//! crate) can be used without creating a dev-dependency cycle that would
//! compile two incompatible versions of this crate.

use fireside_core::error::DomainError;
use fireside_core::id::UserId;
use fireside_roster::profile::*;
use fireside_test_support::InMemoryUserRepository;

fn seal_profile() -> UserProfile {
    UserProfile {
        user_id: UserId::from("seal"),
        nickname: "Seal".into(),
        avatar: "https://bots/seal.png".into(),
        nick_color: "#336699".into(),
        is_bot: true,
    }
}

fn meta(name: &str, avatar: &str, nick_color: &str) -> BotTokenMeta {
    BotTokenMeta {
        user_id: UserId::from("seal"),
        name: name.into(),
        avatar: avatar.into(),
        nick_color: nick_color.into(),
    }
}

#[tokio::test]
async fn test_sync_updates_only_drifted_fields() {
    let users = InMemoryUserRepository::new();
    users.seed(seal_profile());

    let changed = sync_bot_profile(
        &meta("Seal Prime", "https://bots/seal.png", "#336699"),
        &users,
    )
    .await
    .unwrap();

    assert!(changed);
    let profile = users.get(&UserId::from("seal")).await.unwrap().unwrap();
    assert_eq!(profile.nickname, "Seal Prime");
    assert_eq!(profile.avatar, "https://bots/seal.png");
    assert_eq!(profile.nick_color, "#336699");
}

#[tokio::test]
async fn test_sync_is_noop_when_nothing_differs() {
    let users = InMemoryUserRepository::new();
    users.seed(seal_profile());

    let changed = sync_bot_profile(&meta("Seal", "", "  "), &users).await.unwrap();
    assert!(!changed);
    assert_eq!(users.update_count(), 0);
}

#[tokio::test]
async fn test_sync_missing_user_is_not_found() {
    let users = InMemoryUserRepository::new();
    let result = sync_bot_profile(&meta("Seal", "", ""), &users).await;
    assert!(matches!(result, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_sync_blank_user_id_is_noop() {
    let users = InMemoryUserRepository::new();
    let meta = BotTokenMeta {
        user_id: UserId::from(""),
        name: "x".into(),
        avatar: String::new(),
        nick_color: String::new(),
    };
    assert!(!sync_bot_profile(&meta, &users).await.unwrap());
}
