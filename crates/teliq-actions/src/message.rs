//! Messaging actions.

use serde::{Deserialize, Serialize};
use teliq_core::Empty;
use teliq_message::{Message, MessageEvent, MessageType, Sender};

/// `send_private_msg`: send to a friend or temporary chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendPrivateMsg {
    /// Recipient.
    pub user_id: i64,
    /// Content.
    pub message: Message,
}

impl SendPrivateMsg {
    /// Message to `user_id`.
    pub fn new(user_id: i64, message: impl Into<Message>) -> Self {
        Self {
            user_id,
            message: message.into(),
        }
    }
}

/// `send_group_msg`: send to a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendGroupMsg {
    /// Target group.
    pub group_id: i64,
    /// Content.
    pub message: Message,
}

impl SendGroupMsg {
    /// Message to `group_id`.
    pub fn new(group_id: i64, message: impl Into<Message>) -> Self {
        Self {
            group_id,
            message: message.into(),
        }
    }
}

/// `send_msg`: send to a user or a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendMsg {
    /// Explicit target kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    /// Recipient for private messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Target for group messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Content.
    pub message: Message,
}

impl SendMsg {
    /// Private message to `user_id`.
    pub fn private(user_id: i64, message: impl Into<Message>) -> Self {
        Self {
            message_type: Some(MessageType::Private),
            user_id: Some(user_id),
            group_id: None,
            message: message.into(),
        }
    }

    /// Group message to `group_id`.
    pub fn group(group_id: i64, message: impl Into<Message>) -> Self {
        Self {
            message_type: Some(MessageType::Group),
            user_id: None,
            group_id: Some(group_id),
            message: message.into(),
        }
    }
}

/// `delete_msg`: recall a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteMsg {
    /// Message to recall.
    pub message_id: i64,
}

/// `get_msg`: fetch a message by ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GetMsg {
    /// Message to fetch.
    pub message_id: i64,
}

/// `get_forward_msg`: expand a forward bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GetForwardMsg {
    /// Forward bundle ID (the `id` of a `forward` segment).
    pub id: String,
}

/// `send_like`: like a user's profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SendLike {
    /// Target user.
    pub user_id: i64,
    /// Number of likes.
    pub times: u32,
}

/// Result of the send actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageId {
    /// ID of the sent message.
    pub message_id: i64,
}

/// One message inside an expanded forward bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForwardedMessage {
    /// Original message ID, when known.
    pub message_id: i64,
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Original sender.
    pub sender: Sender,
    /// Content.
    pub message: Message,
}

/// Result of `get_forward_msg`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForwardMessages {
    /// Messages in bundle order.
    pub messages: Vec<ForwardedMessage>,
}

actions! {
    SendPrivateMsg => "send_private_msg" => MessageId,
    SendGroupMsg => "send_group_msg" => MessageId,
    SendMsg => "send_msg" => MessageId,
    DeleteMsg => "delete_msg" => Empty,
    GetMsg => "get_msg" => MessageEvent,
    GetForwardMsg => "get_forward_msg" => ForwardMessages,
    SendLike => "send_like" => Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teliq_core::Action;
    use teliq_message::Segment;

    #[test]
    fn send_private_params() {
        let params = SendPrivateMsg::new(10001, Message::new().text("hi").face(1));
        assert_eq!(SendPrivateMsg::NAME, "send_private_msg");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "user_id": 10001,
                "message": [
                    {"type": "text", "data": {"text": "hi"}},
                    {"type": "face", "data": {"id": "1"}}
                ]
            })
        );
    }

    #[test]
    fn send_msg_omits_unused_target() {
        let v = serde_json::to_value(SendMsg::group(30003, "yo")).unwrap();
        assert_eq!(v["message_type"], "group");
        assert_eq!(v["group_id"], 30003);
        assert!(v.get("user_id").is_none());
    }

    #[test]
    fn message_id_result() {
        let out: <SendGroupMsg as Action>::Output =
            serde_json::from_value(json!({"message_id": 42})).unwrap();
        assert_eq!(out.message_id, 42);
    }

    #[test]
    fn forward_messages_result() {
        let out: ForwardMessages = serde_json::from_value(json!({
            "messages": [{
                "sender": {"user_id": 1, "nickname": "a"},
                "time": 5,
                "message": [{"type": "text", "data": {"text": "inner"}}]
            }]
        }))
        .unwrap();
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].message.segments(), [Segment::text("inner")]);
    }

    #[test]
    fn names_listed() {
        assert_eq!(NAMES.len(), 7);
        assert!(NAMES.contains(&"get_forward_msg"));
    }
}
