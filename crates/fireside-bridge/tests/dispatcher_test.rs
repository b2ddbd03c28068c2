//! Frame dispatcher tests.
//!
//! Relocated from an in-crate `#[cfg(test)] mod tests` to an integration test
//! so the shared `fireside-test-support` mocks (which depend back on this
//! crate) can be used without creating a dev-dependency cycle that would
//! compile two incompatible versions of this crate.

use std::sync::Arc;

use fireside_bridge::connection::ConnectionId;
use fireside_bridge::dispatcher::{FrameDispatcher, InboundHandler};
use fireside_bridge::registry::PendingRegistry;
use fireside_bridge::token::EchoToken;
use fireside_core::clock::SystemClock;
use fireside_test_support::RecordingHandler;

fn dispatcher_with_handler() -> (Arc<PendingRegistry>, Arc<RecordingHandler>, FrameDispatcher) {
    let registry = Arc::new(PendingRegistry::new(Arc::new(SystemClock)));
    let handler = Arc::new(RecordingHandler::new());
    let dispatcher = FrameDispatcher::new(
        Arc::clone(&registry),
        Arc::clone(&handler) as Arc<dyn InboundHandler>,
    );
    (registry, handler, dispatcher)
}

#[tokio::test]
async fn test_response_frame_completes_pending_entry() {
    let (registry, handler, dispatcher) = dispatcher_with_handler();
    let token = EchoToken::from("e-1");
    let receiver = registry.register(token.clone(), "character.get").unwrap();

    let raw = br#"{"api":"","echo":"e-1","data":{"ok":true,"data":{"name":"Alice"}}}"#;
    dispatcher.on_frame(ConnectionId::generate(), raw).await;

    let reply = receiver.await.unwrap();
    assert!(reply.ok);
    assert_eq!(reply.data.unwrap()["name"], "Alice");
    assert!(handler.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_response_body_becomes_synthetic_failure() {
    let (registry, _handler, dispatcher) = dispatcher_with_handler();
    let token = EchoToken::from("e-2");
    let receiver = registry.register(token.clone(), "character.get").unwrap();

    // `data` is not an object with an `ok` field.
    let raw = br#"{"api":"","echo":"e-2","data":"not-a-reply"}"#;
    dispatcher.on_frame(ConnectionId::generate(), raw).await;

    let reply = receiver.await.unwrap();
    assert!(!reply.ok);
    assert_eq!(reply.error.as_deref(), Some("malformed bot response"));
}

#[tokio::test]
async fn test_response_for_unknown_token_is_dropped_silently() {
    let (registry, handler, dispatcher) = dispatcher_with_handler();

    let raw = br#"{"api":"","echo":"nobody","data":{"ok":true}}"#;
    dispatcher.on_frame(ConnectionId::generate(), raw).await;

    assert!(registry.is_empty());
    assert!(handler.requests().is_empty());
}

#[tokio::test]
async fn test_request_frame_routes_to_business_handler() {
    let (registry, handler, dispatcher) = dispatcher_with_handler();

    let raw = br#"{"api":"message.create","echo":"e-3","data":{"content":"1d20"}}"#;
    dispatcher.on_frame(ConnectionId::generate(), raw).await;

    let requests = handler.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].api, "message.create");
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_unparseable_frame_is_dropped() {
    let (registry, handler, dispatcher) = dispatcher_with_handler();

    dispatcher.on_frame(ConnectionId::generate(), b"not json").await;

    assert!(registry.is_empty());
    assert!(handler.requests().is_empty());
}
