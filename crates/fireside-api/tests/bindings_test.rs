//! Integration tests for the binding routes.

mod common;

use axum::http::StatusCode;
use fireside_core::id::{ChannelId, UserId};
use fireside_roster::directory::ChannelRecord;
use serde_json::json;

#[tokio::test]
async fn test_binding_upsert_and_list() {
    let (state, app) = common::build_test_app();
    state
        .directory
        .upsert_channel(ChannelId::from("ch-1"), ChannelRecord::open());
    state
        .directory
        .add_member(&ChannelId::from("ch-1"), UserId::from("u-1"));

    let (_, body) = common::post_json(
        &app,
        "/api/v1/templates",
        "u-1",
        &json!({ "name": "Investigator", "sheetType": "coc7", "content": "x" }),
    )
    .await;
    let template_id = body["item"]["id"].as_str().unwrap().to_owned();

    let (status, body) = common::request_json(
        &app,
        "PUT",
        "/api/v1/bindings",
        "u-1",
        Some(&json!({
            "channelId": "ch-1",
            "externalCardId": "card-1",
            "cardName": "Alice",
            "templateId": template_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["mode"], "managed");
    assert_eq!(body["item"]["sheetType"], "coc7");

    let (status, body) =
        common::get_json(&app, "/api/v1/bindings?channelId=ch-1", "u-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_binding_list_requires_membership() {
    let (state, app) = common::build_test_app();
    state
        .directory
        .upsert_channel(ChannelId::from("ch-1"), ChannelRecord::open());

    let (status, body) = common::get_json(&app, "/api/v1/bindings?channelId=ch-1", "u-1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_binding_upsert_rejects_unknown_mode() {
    let (state, app) = common::build_test_app();
    state
        .directory
        .upsert_channel(ChannelId::from("ch-1"), ChannelRecord::open());
    state
        .directory
        .add_member(&ChannelId::from("ch-1"), UserId::from("u-1"));

    let (status, body) = common::request_json(
        &app,
        "PUT",
        "/api/v1/bindings",
        "u-1",
        Some(&json!({
            "channelId": "ch-1",
            "externalCardId": "card-1",
            "mode": "frozen"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}
