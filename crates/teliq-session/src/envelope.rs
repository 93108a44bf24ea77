//! Wire envelopes.
//!
//! Outbound: `{"action", "params", "echo"}`.
//! Inbound response: `{"status", "retcode", "data", "message", "wording", "echo"}`.

use serde::Serialize;
use serde_json::Value;
use teliq_core::{CallError, CallResult, EchoId};

/// Outbound request envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    /// Wire action name.
    pub action: &'a str,
    /// Action parameters.
    pub params: &'a Value,
    /// Correlation ID.
    pub echo: &'a EchoId,
}

impl<'a> Envelope<'a> {
    /// Build an envelope.
    pub fn new(action: &'a str, params: &'a Value, echo: &'a EchoId) -> Self {
        Self {
            action,
            params,
            echo,
        }
    }

    /// Serialize as a text frame.
    pub fn to_text(&self) -> CallResult<String> {
        serde_json::to_string(self).map_err(|e| CallError::EncodingFailed(e.to_string()))
    }
}

/// Response to a call, matched to its caller by `echo`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallResponse {
    /// `ok` on success.
    pub status: String,
    /// `0` on success.
    pub retcode: i64,
    /// Result payload.
    pub data: Value,
    /// Error message.
    pub message: String,
    /// Human-readable error message.
    pub wording: String,
    /// Correlation ID copied from the request.
    pub echo: String,
}

impl CallResponse {
    /// Read a response out of a parsed frame.
    ///
    /// Missing or mistyped fields fall back to empty values so a malformed
    /// response still reaches its caller as an error instead of a timeout.
    pub fn from_value(echo: String, value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        let retcode = match value.get("retcode") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(-1),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(-1),
            _ => 0,
        };
        Self {
            status: text("status"),
            retcode,
            data: value.get("data").cloned().unwrap_or(Value::Null),
            message: text("message"),
            wording: text("wording"),
            echo,
        }
    }

    /// Whether the remote side reported success.
    pub fn is_ok(&self) -> bool {
        self.status == "ok" && self.retcode == 0
    }

    /// `data` on success, [`CallError::Api`] otherwise.
    pub fn into_result(self) -> CallResult<Value> {
        if self.is_ok() {
            return Ok(self.data);
        }
        let message = if self.message.is_empty() {
            self.wording
        } else {
            self.message
        };
        let message = if message.is_empty() {
            format!("status `{}`", self.status)
        } else {
            message
        };
        Err(CallError::Api {
            code: self.retcode,
            message,
        })
    }
}
