//! Inbound frame classification.
//!
//! Every text frame is exactly one of: a response to a pending call, an
//! asynchronous event, a liveness heartbeat, or unrecognized. Classification
//! only looks at top-level keys; typed decoding of payloads happens later.

use serde_json::Value;
use teliq_message::{CodecError, MessageEvent};

use crate::envelope::CallResponse;

/// Classified inbound text frame.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundFrame {
    /// Response to a call that is still pending.
    CallResponse(CallResponse),
    /// Asynchronous event.
    Event(Event),
    /// Liveness heartbeat.
    Heartbeat(Heartbeat),
    /// Anything else, including responses to calls that already completed.
    Unrecognized(String),
}

/// Asynchronous event pushed by the remote side.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// `message`, `message_sent`, `notice`, `request` or `meta_event`.
    pub post_type: String,
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Bot account that produced the event.
    pub self_id: i64,
    /// The full event document.
    pub raw: Value,
}

impl Event {
    fn from_value(value: Value) -> Self {
        let post_type = match value.get("post_type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Self {
            post_type,
            time: value.get("time").and_then(Value::as_i64).unwrap_or_default(),
            self_id: value.get("self_id").and_then(Value::as_i64).unwrap_or_default(),
            raw: value,
        }
    }

    /// Second-level type (`message_type`, `notice_type`, `request_type` or
    /// `meta_event_type`, depending on `post_type`).
    pub fn detail_type(&self) -> Option<&str> {
        let key = match self.post_type.as_str() {
            "message" | "message_sent" => "message_type",
            "notice" => "notice_type",
            "request" => "request_type",
            "meta_event" => "meta_event_type",
            _ => return None,
        };
        self.raw.get(key).and_then(Value::as_str)
    }

    /// Whether this event carries a chat message.
    pub fn is_message(&self) -> bool {
        teliq_message::event::MESSAGE_POST_TYPES.contains(&self.post_type.as_str())
    }

    /// Decode as a typed message event.
    pub fn message(&self) -> Result<MessageEvent, CodecError> {
        MessageEvent::from_value(&self.raw)
    }
}

/// Liveness heartbeat.
#[derive(Clone, Debug, PartialEq)]
pub struct Heartbeat {
    /// Server status document.
    pub status: Value,
    /// Announced heartbeat interval in milliseconds.
    pub interval: u64,
}

/// Classify one inbound text frame.
///
/// `is_pending` reports whether an `echo` belongs to an outstanding call.
pub fn classify<F>(text: &str, is_pending: F) -> InboundFrame
where
    F: Fn(&str) -> bool,
{
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return InboundFrame::Unrecognized(text.to_owned());
    };
    if !value.is_object() {
        return InboundFrame::Unrecognized(text.to_owned());
    }

    if let Some(echo) = value.get("echo").and_then(Value::as_str) {
        if is_pending(echo) {
            return InboundFrame::CallResponse(CallResponse::from_value(echo.to_owned(), &value));
        }
    }

    if value.get("post_type").is_some() {
        return InboundFrame::Event(Event::from_value(value));
    }

    if let (Some(status), Some(interval)) = (value.get("status"), value.get("interval")) {
        return InboundFrame::Heartbeat(Heartbeat {
            status: status.clone(),
            interval: interval.as_u64().unwrap_or_default(),
        });
    }

    InboundFrame::Unrecognized(text.to_owned())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn none_pending(_: &str) -> bool {
        false
    }

    #[test]
    fn pending_echo_is_response() {
        let text = json!({"status": "ok", "retcode": 0, "data": {"message_id": 42}, "echo": "e1"})
            .to_string();
        let frame = classify(&text, |e| e == "e1");
        assert_matches!(frame, InboundFrame::CallResponse(r) if r.echo == "e1" && r.data["message_id"] == 42);
    }

    #[test]
    fn echo_wins_over_post_type() {
        let text = json!({"post_type": "message", "status": "ok", "retcode": 0, "echo": "e1"})
            .to_string();
        assert_matches!(classify(&text, |e| e == "e1"), InboundFrame::CallResponse(_));
    }

    #[test]
    fn stale_echo_is_unrecognized() {
        let text = json!({"status": "ok", "retcode": 0, "data": null, "echo": "gone"}).to_string();
        assert_eq!(classify(&text, none_pending), InboundFrame::Unrecognized(text.clone()));
    }

    #[test]
    fn post_type_is_event() {
        let text = json!({
            "post_type": "notice",
            "notice_type": "group_increase",
            "time": 1_700_000_000,
            "self_id": 10001
        })
        .to_string();
        let InboundFrame::Event(ev) = classify(&text, none_pending) else {
            panic!("expected event");
        };
        assert_eq!(ev.post_type, "notice");
        assert_eq!(ev.detail_type(), Some("group_increase"));
        assert_eq!(ev.time, 1_700_000_000);
        assert_eq!(ev.self_id, 10001);
        assert!(!ev.is_message());
    }

    #[test]
    fn heartbeat_shape() {
        let text = json!({"status": "ok", "interval": 5000}).to_string();
        assert_eq!(
            classify(&text, none_pending),
            InboundFrame::Heartbeat(Heartbeat {
                status: json!("ok"),
                interval: 5000
            })
        );
    }

    #[test]
    fn status_without_interval_is_unrecognized() {
        let text = json!({"status": "ok"}).to_string();
        assert_matches!(classify(&text, none_pending), InboundFrame::Unrecognized(_));
    }

    #[test]
    fn garbage_is_unrecognized() {
        assert_eq!(
            classify("not json", none_pending),
            InboundFrame::Unrecognized("not json".into())
        );
        assert_matches!(classify("[1,2]", none_pending), InboundFrame::Unrecognized(_));
    }

    #[test]
    fn message_event_decodes() {
        let text = json!({
            "post_type": "message",
            "message_type": "private",
            "sub_type": "friend",
            "time": 1,
            "self_id": 10001,
            "message_id": 7,
            "user_id": 20002,
            "message": [{"type": "text", "data": {"text": "hi"}}],
            "raw_message": "hi",
            "font": 0,
            "sender": {"user_id": 20002, "nickname": "bob"}
        })
        .to_string();
        let InboundFrame::Event(ev) = classify(&text, none_pending) else {
            panic!("expected event");
        };
        assert!(ev.is_message());
        assert_eq!(ev.detail_type(), Some("private"));
        let msg = ev.message().unwrap();
        assert_eq!(msg.plain_text(), "hi");
        assert_eq!(msg.sender.nickname, "bob");
    }
}
