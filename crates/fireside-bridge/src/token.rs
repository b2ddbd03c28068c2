//! Correlation tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier pairing an outbound request with its eventual inbound response.
///
/// Fresh tokens combine a process-wide monotonic counter with a random 64-bit
/// suffix, so a collision while a request is pending is negligible. Tokens
/// read off the wire are kept verbatim as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EchoToken(String);

impl EchoToken {
    /// Generates a fresh token.
    #[must_use]
    pub fn fresh() -> Self {
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix: u64 = rand::random();
        Self(format!("{sequence:x}-{suffix:016x}"))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EchoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EchoToken {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for EchoToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}
