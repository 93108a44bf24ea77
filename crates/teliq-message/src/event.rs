//! Typed inbound message events.
//!
//! Events arrive as loosely-shaped objects keyed by `post_type`. Only the
//! `message` and `message_sent` families are decoded here; everything else
//! stays a raw document for the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::codec;
use crate::error::CodecError;
use crate::message::Message;

/// `post_type` values that carry a chat message.
pub const MESSAGE_POST_TYPES: [&str; 2] = ["message", "message_sent"];

/// Where the message was posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// One-to-one chat.
    Private,
    /// Group chat.
    Group,
}

/// Sender profile attached to a message event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    /// Sender's user ID.
    pub user_id: i64,
    /// Account nickname.
    pub nickname: String,
    /// Group card (group messages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    /// Group role: `owner`, `admin` or `member`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A received (or self-sent) chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Bot account that received the event.
    pub self_id: i64,
    /// `message` or `message_sent`.
    pub post_type: String,
    /// Private or group.
    pub message_type: MessageType,
    /// Finer classification (`friend`, `normal`, …).
    #[serde(default)]
    pub sub_type: String,
    /// Message ID, usable with `reply`/`delete_msg`.
    pub message_id: i64,
    /// Sender's user ID.
    pub user_id: i64,
    /// Group ID for group messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Decoded segments.
    #[serde(deserialize_with = "deserialize_message")]
    pub message: Message,
    /// Raw (CQ-coded) text form.
    #[serde(default)]
    pub raw_message: String,
    /// Font ID, unused by most servers.
    #[serde(default)]
    pub font: i64,
    /// Sender profile.
    #[serde(default)]
    pub sender: Sender,
    /// Sequence number within the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_seq: Option<i64>,
    /// Server-side real ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_id: Option<i64>,
}

fn deserialize_message<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Message, D::Error> {
    let value = Value::deserialize(deserializer)?;
    codec::decode_message(&value)
        .map(Message::from)
        .map_err(serde::de::Error::custom)
}

impl MessageEvent {
    /// Decode from a raw event document.
    ///
    /// Fails with [`CodecError::InvalidEvent`] when `post_type` is not a
    /// message family, and with [`CodecError::UnknownMessageKind`] when a
    /// segment carries an unknown tag.
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        let post_type = value.get("post_type").and_then(Value::as_str);
        match post_type {
            Some(p) if MESSAGE_POST_TYPES.contains(&p) => {}
            Some(p) => {
                return Err(CodecError::InvalidEvent(format!(
                    "post_type `{p}` is not a message event"
                )));
            }
            None => return Err(CodecError::InvalidEvent("missing post_type".into())),
        }
        Self::deserialize(value).map_err(|e| CodecError::from_serde(&e))
    }

    /// Whether this was posted in a group.
    pub fn is_group(&self) -> bool {
        self.message_type == MessageType::Group
    }

    /// Event time, if the timestamp is in range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }

    /// Concatenated text of the message.
    pub fn plain_text(&self) -> String {
        self.message.plain_text()
    }
}
