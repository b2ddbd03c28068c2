//! Test connections — mock `BotConnection` and `InboundHandler`
//! implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use fireside_bridge::connection::{BotConnection, ConnectionId, SendError};
use fireside_bridge::dispatcher::InboundHandler;
use fireside_bridge::envelope::BotFrame;
use tokio::sync::Notify;

/// A connection that records every frame written to it and always succeeds.
pub struct RecordingConnection {
    id: ConnectionId,
    frames: Mutex<Vec<Vec<u8>>>,
    notify: Notify,
}

impl RecordingConnection {
    /// Creates a connection with a fresh id and no recorded frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ConnectionId::generate(),
            frames: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }

    /// Returns every recorded frame, parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if a recorded frame is not valid JSON or the internal mutex is
    /// poisoned.
    pub fn sent(&self) -> Vec<serde_json::Value> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|frame| serde_json::from_slice(frame).unwrap())
            .collect()
    }

    /// Waits until the frame at `index` has been recorded and returns it
    /// parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the recorded frame is not valid JSON or the internal mutex
    /// is poisoned.
    pub async fn wait_for_frame(&self, index: usize) -> serde_json::Value {
        loop {
            let notified = self.notify.notified();
            if let Some(frame) = self.frames.lock().unwrap().get(index) {
                return serde_json::from_slice(frame).unwrap();
            }
            notified.await;
        }
    }
}

impl Default for RecordingConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BotConnection for RecordingConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, frame: &[u8]) -> Result<(), SendError> {
        self.frames.lock().unwrap().push(frame.to_vec());
        self.notify.notify_waiters();
        Ok(())
    }
}

/// A connection whose every send fails, as if the peer had disconnected.
pub struct FailingConnection {
    id: ConnectionId,
}

impl FailingConnection {
    /// Creates a connection with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ConnectionId::generate(),
        }
    }
}

impl Default for FailingConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BotConnection for FailingConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, _frame: &[u8]) -> Result<(), SendError> {
        Err(SendError("connection closed".into()))
    }
}

/// An inbound handler that records every request frame routed to it.
pub struct RecordingHandler {
    requests: Mutex<Vec<BotFrame>>,
}

impl RecordingHandler {
    /// Creates a handler with no recorded requests.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every recorded request frame.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<BotFrame> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InboundHandler for RecordingHandler {
    async fn handle_request(&self, _connection: ConnectionId, frame: BotFrame) {
        self.requests.lock().unwrap().push(frame);
    }
}
