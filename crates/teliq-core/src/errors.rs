//! Error taxonomy for remote calls.
//!
//! Every public call completes with either a typed result or a [`CallError`].
//! Transport-level failures never surface per call beyond draining pending
//! calls with [`CallError::ConnectionLost`].

use thiserror::Error;

/// Errors returned by a remote call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CallError {
    /// The call was attempted while the session was not connected.
    #[error("session is not connected")]
    NotConnected,

    /// No matching response arrived within the deadline.
    #[error("{action} timed out after {timeout_ms}ms")]
    Timeout {
        /// The action that timed out.
        action: String,
        /// How long we waited.
        timeout_ms: u64,
    },

    /// The connection dropped or was closed while the call was pending.
    #[error("connection lost while the call was pending")]
    ConnectionLost,

    /// The request could not be serialized.
    #[error("failed to encode request: {0}")]
    EncodingFailed(String),

    /// The response could not be decoded into the expected type.
    #[error("failed to decode response: {0}")]
    DecodingFailed(String),

    /// The remote side reported a non-ok status or a non-zero retcode.
    #[error("API error ({code}): {message}")]
    Api {
        /// The `retcode` reported by the remote side.
        code: i64,
        /// The `message` (or `wording`) reported by the remote side.
        message: String,
    },

    /// A message part carried a type tag the codec does not know.
    #[error("unknown message kind: {tag}")]
    UnknownMessageKind {
        /// The offending tag.
        tag: String,
    },

    /// A correlation ID was registered twice.
    #[error("correlation id collision: {echo}")]
    CorrelationCollision {
        /// The duplicated correlation ID.
        echo: String,
    },
}

impl CallError {
    /// Whether the failure came from the connection rather than the call itself.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::NotConnected | Self::ConnectionLost)
    }
}

impl From<serde_json::Error> for CallError {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodingFailed(err.to_string())
    }
}

/// Result type for remote calls.
pub type CallResult<T> = std::result::Result<T, CallError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
