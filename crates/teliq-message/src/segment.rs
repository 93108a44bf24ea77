//! Message segment types.
//!
//! A segment is one tagged unit of chat content. On the wire every segment is
//! `{"type": <tag>, "data": {...}}`; the data record depends on the tag. The
//! records here cover both directions: fields only the server fills in
//! (`url`, `file_id`, …) are optional and omitted when absent.
//!
//! Identifier fields (`qq`, `id`, …) stay strings at this boundary; numeric
//! conversion is left to the caller.

use std::fmt;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Segment
// ─────────────────────────────────────────────────────────────────────────────

/// One tagged unit of chat content.
///
/// Serialization goes through [`crate::codec`]; unknown tags fail to decode
/// with [`crate::CodecError::UnknownMessageKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Plain text.
    Text(TextData),
    /// Mention of a user (or everyone).
    At(AtData),
    /// Quote of an earlier message.
    Reply(ReplyData),
    /// Built-in face.
    Face(FaceData),
    /// Market sticker.
    Mface(MfaceData),
    /// Image.
    Image(ImageData),
    /// File attachment.
    File(FileData),
    /// Video.
    Video(VideoData),
    /// Voice clip.
    Record(FileData),
    /// Raw structured (JSON card) payload.
    Json(JsonData),
    /// Markdown block.
    Markdown(MarkdownData),
    /// Dice magic face.
    Dice(DiceData),
    /// Rock-paper-scissors magic face.
    Rps(RpsData),
    /// Shared music card.
    Music(MusicData),
    /// Forwarded message node.
    Node(NodeData),
    /// Forwarded message bundle.
    Forward(ForwardData),
    /// Contact card.
    Contact(ContactData),
}

/// Discriminant of a [`Segment`], mapped one-to-one to its wire tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// `text`
    Text,
    /// `at`
    At,
    /// `reply`
    Reply,
    /// `face`
    Face,
    /// `mface`
    Mface,
    /// `image`
    Image,
    /// `file`
    File,
    /// `video`
    Video,
    /// `record`
    Record,
    /// `json`
    Json,
    /// `markdown`
    Markdown,
    /// `dice`
    Dice,
    /// `rps`
    Rps,
    /// `music`
    Music,
    /// `node`
    Node,
    /// `forward`
    Forward,
    /// `contact`
    Contact,
}

impl SegmentKind {
    /// Wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::At => "at",
            Self::Reply => "reply",
            Self::Face => "face",
            Self::Mface => "mface",
            Self::Image => "image",
            Self::File => "file",
            Self::Video => "video",
            Self::Record => "record",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Dice => "dice",
            Self::Rps => "rps",
            Self::Music => "music",
            Self::Node => "node",
            Self::Forward => "forward",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Segment {
    /// Kind of this segment.
    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Text(_) => SegmentKind::Text,
            Self::At(_) => SegmentKind::At,
            Self::Reply(_) => SegmentKind::Reply,
            Self::Face(_) => SegmentKind::Face,
            Self::Mface(_) => SegmentKind::Mface,
            Self::Image(_) => SegmentKind::Image,
            Self::File(_) => SegmentKind::File,
            Self::Video(_) => SegmentKind::Video,
            Self::Record(_) => SegmentKind::Record,
            Self::Json(_) => SegmentKind::Json,
            Self::Markdown(_) => SegmentKind::Markdown,
            Self::Dice(_) => SegmentKind::Dice,
            Self::Rps(_) => SegmentKind::Rps,
            Self::Music(_) => SegmentKind::Music,
            Self::Node(_) => SegmentKind::Node,
            Self::Forward(_) => SegmentKind::Forward,
            Self::Contact(_) => SegmentKind::Contact,
        }
    }

    /// Text content if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(d) => Some(&d.text),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Data records
// ─────────────────────────────────────────────────────────────────────────────

/// `text` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    /// The text.
    pub text: String,
}

/// `at` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtData {
    /// Target user ID, or `all` for everyone.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub qq: String,
}

/// `reply` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyData {
    /// ID of the quoted message.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
}

/// `face` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceData {
    /// Face ID.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
}

/// `mface` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfaceData {
    /// Sticker ID.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub emoji_id: String,
    /// Sticker package ID.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub emoji_package_id: String,
    /// Sticker key.
    pub key: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// `image` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Path, URL, or `base64://` payload.
    pub file: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Image sub type (normal image vs. sticker).
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_type: Option<String>,
    /// Server-side file ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Local path on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Size in bytes.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_size: Option<String>,
    /// Content-unique ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_unique: Option<String>,
}

/// `file` and `record` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    /// Path, URL, or `base64://` payload.
    pub file: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Local path on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Server-side file ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Size in bytes.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_size: Option<String>,
    /// Content-unique ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_unique: Option<String>,
}

/// `video` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoData {
    /// Path, URL, or `base64://` payload.
    pub file: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    /// Local path on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Server-side file ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Size in bytes.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_size: Option<String>,
    /// Content-unique ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_unique: Option<String>,
}

/// `json` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonData {
    /// The JSON card, as a string.
    pub data: String,
}

/// `markdown` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownData {
    /// Markdown source.
    pub content: String,
}

/// `dice` data. `result` is only present on received segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceData {
    /// Rolled value.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<String>,
}

/// `rps` data. `result` is only present on received segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsData {
    /// Thrown hand.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<String>,
}

/// `music` data, tagged by platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MusicData {
    /// QQ Music track.
    #[serde(rename = "qq")]
    Qq {
        /// Track ID.
        #[serde(deserialize_with = "crate::lenient::string")]
        id: String,
    },
    /// NetEase Cloud Music track.
    #[serde(rename = "163")]
    Netease {
        /// Track ID.
        #[serde(deserialize_with = "crate::lenient::string")]
        id: String,
    },
    /// Kugou track.
    #[serde(rename = "kugou")]
    Kugou {
        /// Track ID.
        #[serde(deserialize_with = "crate::lenient::string")]
        id: String,
    },
    /// Migu track.
    #[serde(rename = "migu")]
    Migu {
        /// Track ID.
        #[serde(deserialize_with = "crate::lenient::string")]
        id: String,
    },
    /// Kuwo track.
    #[serde(rename = "kuwo")]
    Kuwo {
        /// Track ID.
        #[serde(deserialize_with = "crate::lenient::string")]
        id: String,
    },
    /// Custom card.
    #[serde(rename = "custom")]
    Custom {
        /// Link opened on tap.
        url: String,
        /// Audio URL.
        audio: String,
        /// Title.
        title: String,
        /// Cover image URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        /// Artist.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        singer: Option<String>,
    },
}

/// `node` data: either a reference to an existing message (`id`) or custom
/// content attributed to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    /// ID of an existing message to forward.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Displayed sender ID for custom content.
    #[serde(
        default,
        deserialize_with = "crate::lenient::option_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    /// Displayed sender name for custom content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Custom content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Segment>>,
}

/// `forward` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardData {
    /// Forward bundle ID.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
    /// Expanded content, when the server inlines it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Segment>>,
}

/// `contact` data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactData {
    /// Contact user ID.
    #[serde(deserialize_with = "crate::lenient::string")]
    pub id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience constructors
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap raw bytes as a `base64://` payload accepted by media `file` fields.
pub fn base64_payload(bytes: &[u8]) -> String {
    format!(
        "base64://{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

impl Segment {
    /// Text segment.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextData { text: text.into() })
    }

    /// Mention a user by ID.
    #[must_use]
    pub fn at(qq: impl ToString) -> Self {
        Self::At(AtData { qq: qq.to_string() })
    }

    /// Mention everyone.
    #[must_use]
    pub fn at_all() -> Self {
        Self::at("all")
    }

    /// Quote a message by ID.
    #[must_use]
    pub fn reply(id: impl ToString) -> Self {
        Self::Reply(ReplyData { id: id.to_string() })
    }

    /// Built-in face by ID.
    #[must_use]
    pub fn face(id: impl ToString) -> Self {
        Self::Face(FaceData { id: id.to_string() })
    }

    /// Market sticker.
    #[must_use]
    pub fn mface(
        emoji_id: impl Into<String>,
        emoji_package_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::Mface(MfaceData {
            emoji_id: emoji_id.into(),
            emoji_package_id: emoji_package_id.into(),
            key: key.into(),
            summary: None,
        })
    }

    /// Image from a path, URL, or `base64://` payload.
    #[must_use]
    pub fn image(file: impl Into<String>) -> Self {
        Self::Image(ImageData {
            file: file.into(),
            ..ImageData::default()
        })
    }

    /// Image from raw bytes.
    #[must_use]
    pub fn image_bytes(bytes: &[u8]) -> Self {
        Self::image(base64_payload(bytes))
    }

    /// File attachment with an optional display name.
    #[must_use]
    pub fn file(file: impl Into<String>, name: Option<String>) -> Self {
        Self::File(FileData {
            file: file.into(),
            name,
            ..FileData::default()
        })
    }

    /// File attachment from raw bytes.
    #[must_use]
    pub fn file_bytes(bytes: &[u8], name: Option<String>) -> Self {
        Self::file(base64_payload(bytes), name)
    }

    /// Video with an optional preview image.
    #[must_use]
    pub fn video(file: impl Into<String>, thumb: Option<String>) -> Self {
        Self::Video(VideoData {
            file: file.into(),
            thumb,
            ..VideoData::default()
        })
    }

    /// Voice clip.
    #[must_use]
    pub fn record(file: impl Into<String>) -> Self {
        Self::Record(FileData {
            file: file.into(),
            ..FileData::default()
        })
    }

    /// JSON card.
    #[must_use]
    pub fn json(data: impl Into<String>) -> Self {
        Self::Json(JsonData { data: data.into() })
    }

    /// Markdown block.
    #[must_use]
    pub fn markdown(content: impl Into<String>) -> Self {
        Self::Markdown(MarkdownData {
            content: content.into(),
        })
    }

    /// Dice magic face.
    #[must_use]
    pub fn dice() -> Self {
        Self::Dice(DiceData::default())
    }

    /// Rock-paper-scissors magic face.
    #[must_use]
    pub fn rps() -> Self {
        Self::Rps(RpsData::default())
    }

    /// Music card.
    #[must_use]
    pub fn music(data: MusicData) -> Self {
        Self::Music(data)
    }

    /// Custom music card.
    #[must_use]
    pub fn custom_music(
        url: impl Into<String>,
        audio: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self::Music(MusicData::Custom {
            url: url.into(),
            audio: audio.into(),
            title: title.into(),
            image: None,
            singer: None,
        })
    }

    /// Forward node referencing an existing message.
    #[must_use]
    pub fn node(id: impl ToString) -> Self {
        Self::Node(NodeData {
            id: Some(id.to_string()),
            ..NodeData::default()
        })
    }

    /// Forward node with custom content attributed to a user.
    #[must_use]
    pub fn custom_node(
        user_id: impl ToString,
        nickname: impl Into<String>,
        content: Vec<Segment>,
    ) -> Self {
        Self::Node(NodeData {
            id: None,
            user_id: Some(user_id.to_string()),
            nickname: Some(nickname.into()),
            content: Some(content),
        })
    }

    /// Forward bundle by ID.
    #[must_use]
    pub fn forward(id: impl ToString) -> Self {
        Self::Forward(ForwardData {
            id: id.to_string(),
            content: None,
        })
    }

    /// Contact card for a user.
    #[must_use]
    pub fn contact(id: impl ToString) -> Self {
        Self::Contact(ContactData { id: id.to_string() })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags() {
        assert_eq!(Segment::text("x").kind().as_str(), "text");
        assert_eq!(Segment::record("a.amr").kind(), SegmentKind::Record);
        assert_eq!(Segment::music(MusicData::Qq { id: "1".into() }).kind().to_string(), "music");
    }

    #[test]
    fn numeric_ids_become_strings() {
        assert_eq!(Segment::at(12345), Segment::at("12345"));
        assert_eq!(Segment::reply(998_i64), Segment::reply("998"));
        assert_eq!(Segment::contact(10001_u64), Segment::contact("10001"));
    }

    #[test]
    fn at_all_uses_literal() {
        let Segment::At(data) = Segment::at_all() else {
            panic!("expected at segment");
        };
        assert_eq!(data.qq, "all");
    }

    #[test]
    fn image_bytes_is_base64_payload() {
        let Segment::Image(data) = Segment::image_bytes(b"png") else {
            panic!("expected image segment");
        };
        assert_eq!(data.file, "base64://cG5n");
    }

    #[test]
    fn custom_node_holds_content() {
        let node = Segment::custom_node(10001, "bot", vec![Segment::text("hi")]);
        let Segment::Node(data) = node else {
            panic!("expected node segment");
        };
        assert!(data.id.is_none());
        assert_eq!(data.user_id.as_deref(), Some("10001"));
        assert_eq!(data.content.unwrap().len(), 1);
    }

    #[test]
    fn as_text_only_for_text() {
        assert_eq!(Segment::text("hey").as_text(), Some("hey"));
        assert!(Segment::face(1).as_text().is_none());
    }
}
