//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fireside_api::routes;
use fireside_api::state::AppState;
use fireside_core::clock::Clock;
use fireside_roster::directory::MemberDirectory;
use fireside_test_support::{
    FixedClock, InMemoryBindingRepository, InMemoryTemplateRepository, InMemoryUserRepository,
};

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over in-memory stores and an empty directory.
/// Uses the same route structure as `main.rs`. The returned state shares the
/// roster, dispatcher and directory with the router, so tests can connect
/// fake bot sessions without a WebSocket.
pub fn build_test_app() -> (AppState, Router) {
    let state = AppState::new(
        Arc::new(InMemoryTemplateRepository::new()),
        Arc::new(InMemoryBindingRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(MemberDirectory::new()),
        fixed_clock(),
        Duration::from_millis(500),
    );

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::bot_ws::router())
        .nest("/api/v1/templates", routes::templates::router())
        .nest("/api/v1/bindings", routes::bindings::router())
        .nest("/api/v1/characters", routes::characters::router())
        .with_state(state.clone());

    (state, app)
}

/// Send a request with an optional JSON body as `user` and return the
/// response.
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    user: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(routes::USER_HEADER, user);
    let request = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    user: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request_json(app, "POST", uri, user, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str, user: &str) -> (StatusCode, serde_json::Value) {
    request_json(app, "GET", uri, user, None).await
}
