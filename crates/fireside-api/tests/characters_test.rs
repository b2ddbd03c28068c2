//! Integration tests for the character passthrough routes.
//!
//! Bot sessions are faked by inserting a recording connection straight into
//! the shared roster and feeding response frames to the shared dispatcher,
//! exactly what the WebSocket read loop would do.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use fireside_bridge::connection::{BotConnection, BotPeer};
use fireside_bridge::envelope::{BotFrame, BotReply};
use fireside_bridge::token::EchoToken;
use fireside_core::id::{ChannelId, UserId};
use fireside_roster::directory::ChannelRecord;
use fireside_test_support::RecordingConnection;
use serde_json::json;

fn connect_bot(state: &fireside_api::state::AppState) -> Arc<RecordingConnection> {
    state
        .directory
        .upsert_channel(ChannelId::from("ch-1"), ChannelRecord::open());
    state
        .directory
        .grant_bot_role(&ChannelId::from("ch-1"), UserId::from("seal"));
    state.directory.flag_bot_account(UserId::from("seal"));

    let connection = Arc::new(RecordingConnection::new());
    state.roster.insert(BotPeer {
        connection: Arc::clone(&connection) as _,
        user_id: UserId::from("seal"),
    });
    connection
}

#[tokio::test]
async fn test_character_get_round_trips_through_bot() {
    let (state, app) = common::build_test_app();
    let connection = connect_bot(&state);

    let respond = {
        let dispatcher = Arc::clone(&state.dispatcher);
        let connection = Arc::clone(&connection);
        async move {
            let frame = connection.wait_for_frame(0).await;
            assert_eq!(frame["api"], "character.get");
            assert_eq!(frame["data"]["group_id"], "ch-1");
            assert_eq!(frame["data"]["user_id"], "alice");

            let reply = BotReply::success(json!({"name": "Alice", "attrs": {"str": 60}}));
            let raw = serde_json::to_vec(&BotFrame::response(
                EchoToken::from(frame["echo"].as_str().unwrap()),
                &reply,
            ))
            .unwrap();
            dispatcher.on_frame(connection.id(), &raw).await;
        }
    };

    let get_body = json!({ "channelId": "ch-1" });
    let call = common::post_json(&app, "/api/v1/characters/get", "alice", &get_body);

    let ((status, body), ()) = tokio::join!(call, respond);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["name"], "Alice");
}

#[tokio::test]
async fn test_character_get_without_bot_returns_failure_envelope() {
    let (_state, app) = common::build_test_app();

    let (status, body) = common::post_json(
        &app,
        "/api/v1/characters/get",
        "alice",
        &json!({ "channelId": "ch-1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "no bot connection available");
}

#[tokio::test]
async fn test_character_get_times_out_as_failure_envelope() {
    let (state, app) = common::build_test_app();
    let _connection = connect_bot(&state);

    // 500ms configured timeout, no reply ever sent.
    let (status, body) = common::post_json(
        &app,
        "/api/v1/characters/get",
        "alice",
        &json!({ "channelId": "ch-1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("did not reply"));
}

#[tokio::test]
async fn test_character_list_uses_any_bot_session() {
    let (state, app) = common::build_test_app();
    let connection = connect_bot(&state);

    let respond = {
        let dispatcher = Arc::clone(&state.dispatcher);
        let connection = Arc::clone(&connection);
        async move {
            let frame = connection.wait_for_frame(0).await;
            assert_eq!(frame["api"], "character.list");
            assert_eq!(frame["data"]["user_id"], "alice");

            let reply = BotReply::success(json!({"items": [{"name": "Alice"}]}));
            let raw = serde_json::to_vec(&BotFrame::response(
                EchoToken::from(frame["echo"].as_str().unwrap()),
                &reply,
            ))
            .unwrap();
            dispatcher.on_frame(connection.id(), &raw).await;
        }
    };

    let list_body = json!({});
    let call = common::post_json(&app, "/api/v1/characters/list", "alice", &list_body);

    let ((status, body), ()) = tokio::join!(call, respond);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["items"][0]["name"], "Alice");
}

#[tokio::test]
async fn test_character_set_forwards_attributes() {
    let (state, app) = common::build_test_app();
    let connection = connect_bot(&state);

    let respond = {
        let dispatcher = Arc::clone(&state.dispatcher);
        let connection = Arc::clone(&connection);
        async move {
            let frame = connection.wait_for_frame(0).await;
            assert_eq!(frame["api"], "character.set");
            assert_eq!(frame["data"]["name"], "Alice");
            assert_eq!(frame["data"]["attrs"]["dex"], 70);

            let raw = serde_json::to_vec(&BotFrame::response(
                EchoToken::from(frame["echo"].as_str().unwrap()),
                &BotReply::success(json!({})),
            ))
            .unwrap();
            dispatcher.on_frame(connection.id(), &raw).await;
        }
    };

    let set_body = json!({
        "channelId": "ch-1",
        "name": "Alice",
        "attrs": {"dex": 70}
    });
    let call = common::post_json(&app, "/api/v1/characters/set", "alice", &set_body);

    let ((status, body), ()) = tokio::join!(call, respond);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}
