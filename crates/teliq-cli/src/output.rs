//! JSON-lines rendering of session events.

use serde_json::{Value, json};
use teliq_session::SessionEvent;

/// Render one event as a JSON line, or `None` for events not worth printing.
pub fn event_line(event: &SessionEvent) -> Option<Value> {
    let line = match event {
        SessionEvent::Event(ev) => {
            if ev.is_message() {
                // Prefer the decoded form so segments print uniformly.
                if let Ok(msg) = ev.message() {
                    return Some(json!({"kind": "message", "event": msg}));
                }
            }
            json!({"kind": "event", "postType": ev.post_type, "event": ev.raw})
        }
        SessionEvent::Heartbeat(hb) => {
            json!({"kind": "heartbeat", "status": hb.status, "interval": hb.interval})
        }
        SessionEvent::Connected { headers } => json!({"kind": "connected", "headers": headers}),
        SessionEvent::Disconnected { reason, code } => {
            json!({"kind": "disconnected", "reason": reason, "code": code})
        }
        SessionEvent::PeerClosed => json!({"kind": "peerClosed"}),
        SessionEvent::Error(reason) => json!({"kind": "error", "reason": reason}),
        SessionEvent::ReconnectExhausted { attempts } => {
            json!({"kind": "reconnectExhausted", "attempts": attempts})
        }
        SessionEvent::Unrecognized(text) => json!({"kind": "unrecognized", "text": text}),
        SessionEvent::Binary(_)
        | SessionEvent::Cancelled
        | SessionEvent::StateChanged { .. } => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teliq_session::{ConnectionState, InboundFrame, classify};

    fn event_from(text: &str) -> SessionEvent {
        match classify(text, |_| false) {
            InboundFrame::Event(ev) => SessionEvent::Event(ev),
            InboundFrame::Heartbeat(hb) => SessionEvent::Heartbeat(hb),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn message_events_are_decoded() {
        let ev = event_from(
            r#"{"time":1,"self_id":1,"post_type":"message","message_type":"private",
                "message_id":5,"user_id":2,"message":[{"type":"text","data":{"text":"hi"}}]}"#,
        );
        let line = event_line(&ev).unwrap();
        assert_eq!(line["kind"], "message");
        assert_eq!(line["event"]["message"][0]["data"]["text"], "hi");
    }

    #[test]
    fn other_events_keep_raw_document() {
        let ev = event_from(
            r#"{"time":1,"self_id":1,"post_type":"notice","notice_type":"group_increase"}"#,
        );
        let line = event_line(&ev).unwrap();
        assert_eq!(line["kind"], "event");
        assert_eq!(line["postType"], "notice");
        assert_eq!(line["event"]["notice_type"], "group_increase");
    }

    #[test]
    fn state_changes_are_skipped() {
        let ev = SessionEvent::StateChanged {
            from: ConnectionState::Connecting,
            to: ConnectionState::Connected,
        };
        assert!(event_line(&ev).is_none());
    }

    #[test]
    fn disconnect_line() {
        let ev = SessionEvent::Disconnected {
            reason: "bye".into(),
            code: 1000,
        };
        let line = event_line(&ev).unwrap();
        assert_eq!(line["code"], 1000);
    }
}
