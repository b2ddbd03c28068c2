//! Live bot connections.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use fireside_core::id::UserId;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a single duplex session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generates a fresh connection identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The transport rejected an outbound write.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SendError(pub String);

/// Outbound half of a live duplex session.
///
/// The session may become invalid at any moment (peer disconnect); `send`
/// must then report an error rather than block or panic. Implementations
/// must serialize concurrent sends so interleaved callers never produce
/// partial frames: a single writer task, or a write lock around the sink.
#[async_trait]
pub trait BotConnection: Send + Sync {
    /// Identifier of this session.
    fn id(&self) -> ConnectionId;

    /// Writes one complete frame to the peer.
    async fn send(&self, frame: &[u8]) -> Result<(), SendError>;
}

/// A live, authenticated bot session.
#[derive(Clone)]
pub struct BotPeer {
    /// Outbound handle for the session.
    pub connection: Arc<dyn BotConnection>,
    /// The bot account this session authenticated as.
    pub user_id: UserId,
}

impl fmt::Debug for BotPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotPeer")
            .field("connection", &self.connection.id())
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Concurrency-safe table of the currently connected bot sessions.
///
/// Maintained by the transport layer: `insert` when a session finishes its
/// handshake, `remove` when its read loop exits. Lookups return clones, so a
/// caller can at worst hold a handle whose `send` now fails.
#[derive(Default)]
pub struct ConnectionRoster {
    peers: DashMap<ConnectionId, BotPeer>,
}

impl ConnectionRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a live session.
    pub fn insert(&self, peer: BotPeer) {
        self.peers.insert(peer.connection.id(), peer);
    }

    /// Removes a session, returning it if it was present.
    pub fn remove(&self, id: ConnectionId) -> Option<BotPeer> {
        self.peers.remove(&id).map(|(_, peer)| peer)
    }

    /// Returns a live session for the given bot account, if any.
    #[must_use]
    pub fn find_by_user(&self, user_id: &UserId) -> Option<BotPeer> {
        self.peers
            .iter()
            .find(|entry| &entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
    }

    /// Snapshot of all live sessions.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BotPeer> {
        self.peers.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether no session is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
