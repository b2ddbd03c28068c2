//! Wire envelope shared with the remote bot.
//!
//! Both directions use the same JSON frame: `{"api", "echo", "data"}`. An
//! empty `api` field is the reserved marker that distinguishes a response
//! from a newly-initiated request arriving on the same transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::token::EchoToken;

/// A single frame on the bot transport, in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotFrame {
    /// Operation name; empty for responses.
    pub api: String,
    /// Correlation token pairing a request with its response.
    pub echo: EchoToken,
    /// Operation payload (requests) or reply body (responses).
    #[serde(default)]
    pub data: Value,
}

impl BotFrame {
    /// Builds an outbound request frame.
    #[must_use]
    pub fn request(api: &str, echo: EchoToken, data: Value) -> Self {
        Self {
            api: api.to_owned(),
            echo,
            data,
        }
    }

    /// Builds an outbound response frame carrying `reply`.
    ///
    /// # Panics
    ///
    /// Panics if `BotReply` serialization fails, which cannot happen for a
    /// struct of plain JSON values.
    #[must_use]
    pub fn response(echo: EchoToken, reply: &BotReply) -> Self {
        Self {
            api: String::new(),
            echo,
            data: serde_json::to_value(reply).expect("BotReply serializes to JSON"),
        }
    }

    /// Whether this frame is a response rather than a new inbound request.
    #[must_use]
    pub fn is_response(&self) -> bool {
        self.api.is_empty()
    }
}

/// The body of a bot reply: `{"ok": bool, "data"?: any, "error"?: string}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotReply {
    /// Whether the operation succeeded on the bot side.
    pub ok: bool,
    /// Result payload for successful operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error message for failed operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BotReply {
    /// A successful reply carrying `data`.
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failure reply carrying an error message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
