//! Pending-request registry.
//!
//! Concurrency-safe table of in-flight requests keyed by correlation token.
//! A token is present iff a forward call is currently awaiting its result;
//! every insertion is matched by exactly one removal, on every exit path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fireside_core::clock::Clock;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::envelope::BotReply;
use crate::token::EchoToken;

/// A token was registered while an identical one was still pending.
#[derive(Debug, Error)]
#[error("a request with this correlation token is already pending")]
pub struct AlreadyPending;

struct PendingEntry {
    api: String,
    registered_at: DateTime<Utc>,
    // Capacity-1 slot; at most one delivery ever succeeds.
    slot: oneshot::Sender<BotReply>,
}

/// Table of in-flight bot requests.
pub struct PendingRegistry {
    pending: DashMap<EchoToken, PendingEntry>,
    clock: Arc<dyn Clock>,
}

impl PendingRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            pending: DashMap::new(),
            clock,
        }
    }

    /// Inserts a pending entry for `token` iff the token is absent, returning
    /// the receiving half of its completion slot.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyPending`] when an entry with the same token is still
    /// in flight.
    pub fn register(
        &self,
        token: EchoToken,
        api: &str,
    ) -> Result<oneshot::Receiver<BotReply>, AlreadyPending> {
        let log_token = token.clone();
        match self.pending.entry(token) {
            Entry::Occupied(_) => Err(AlreadyPending),
            Entry::Vacant(vacant) => {
                let (sender, receiver) = oneshot::channel();
                vacant.insert(PendingEntry {
                    api: api.to_owned(),
                    registered_at: self.clock.now(),
                    slot: sender,
                });
                debug!(echo = %log_token, api, "registered pending bot request");
                Ok(receiver)
            }
        }
    }

    /// Removes the entry for `token` and hands `reply` to the waiting caller.
    ///
    /// Returns `false` with no side effect when the token never existed,
    /// already completed, or already timed out; expected under timeout races
    /// and never an error. Safe to call from any task.
    pub fn complete(&self, token: &EchoToken, reply: BotReply) -> bool {
        let Some((_, entry)) = self.pending.remove(token) else {
            debug!(echo = %token, "reply for unknown or expired token dropped");
            return false;
        };
        let waited = self.clock.now() - entry.registered_at;
        match entry.slot.send(reply) {
            Ok(()) => {
                debug!(
                    echo = %token,
                    api = entry.api,
                    waited_ms = waited.num_milliseconds(),
                    "completed pending bot request"
                );
                true
            }
            Err(_) => {
                // The receiving half is gone: the forward call was dropped
                // between its cancel and ours.
                debug!(echo = %token, api = entry.api, "caller gone before delivery");
                false
            }
        }
    }

    /// Unconditionally removes the entry for `token`.
    ///
    /// Used by the timeout path; idempotent and safe to call after
    /// [`Self::complete`] already removed the entry.
    pub fn cancel(&self, token: &EchoToken) {
        self.pending.remove(token);
    }

    /// Number of in-flight requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no request is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use fireside_core::clock::SystemClock;

    use super::*;

    fn registry() -> PendingRegistry {
        PendingRegistry::new(Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn test_register_then_complete_delivers_reply() {
        let registry = registry();
        let token = EchoToken::fresh();
        let receiver = registry.register(token.clone(), "character.get").unwrap();

        assert!(registry.complete(&token, BotReply::success(serde_json::json!({"hp": 7}))));
        let reply = receiver.await.unwrap();
        assert!(reply.ok);
        assert_eq!(reply.data.unwrap()["hp"], 7);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_token() {
        let registry = registry();
        let token = EchoToken::from("dup");
        let _receiver = registry.register(token.clone(), "a").unwrap();
        assert!(registry.register(token, "b").is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_complete_twice_delivers_once() {
        let registry = registry();
        let token = EchoToken::fresh();
        let receiver = registry.register(token.clone(), "character.set").unwrap();

        assert!(registry.complete(&token, BotReply::success(serde_json::json!(1))));
        assert!(!registry.complete(&token, BotReply::success(serde_json::json!(2))));

        let reply = receiver.await.unwrap();
        assert_eq!(reply.data.unwrap(), serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_complete_unknown_token_is_noop() {
        let registry = registry();
        assert!(!registry.complete(&EchoToken::from("ghost"), BotReply::failure("late")));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_race_safe() {
        let registry = registry();
        let token = EchoToken::fresh();
        let receiver = registry.register(token.clone(), "character.list").unwrap();

        registry.cancel(&token);
        registry.cancel(&token);
        assert!(registry.is_empty());

        // A completion attempt after cancel is absorbed.
        assert!(!registry.complete(&token, BotReply::success(serde_json::json!({}))));
        assert!(receiver.await.is_err());
    }

    #[tokio::test]
    async fn test_complete_after_receiver_dropped_reports_undelivered() {
        let registry = registry();
        let token = EchoToken::fresh();
        let receiver = registry.register(token.clone(), "character.get").unwrap();
        drop(receiver);

        assert!(!registry.complete(&token, BotReply::success(serde_json::json!({}))));
        assert!(registry.is_empty());
    }
}
