//! `{type, data}` encoding and table-driven decoding.
//!
//! Encoding writes the literal tag of the segment's kind and serializes its
//! data record under `data`. Decoding reads `type`, looks the tag up in
//! [`DECODERS`], and hands the `data` record to that kind's decoder. A tag
//! missing from the table fails with [`CodecError::UnknownMessageKind`].

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::segment::Segment;

type Decoder = fn(Value) -> Result<Segment, serde_json::Error>;

/// Tag → decoder lookup table, one entry per supported kind.
static DECODERS: &[(&str, Decoder)] = &[
    ("text", |v| serde_json::from_value(v).map(Segment::Text)),
    ("at", |v| serde_json::from_value(v).map(Segment::At)),
    ("reply", |v| serde_json::from_value(v).map(Segment::Reply)),
    ("face", |v| serde_json::from_value(v).map(Segment::Face)),
    ("mface", |v| serde_json::from_value(v).map(Segment::Mface)),
    ("image", |v| serde_json::from_value(v).map(Segment::Image)),
    ("file", |v| serde_json::from_value(v).map(Segment::File)),
    ("video", |v| serde_json::from_value(v).map(Segment::Video)),
    ("record", |v| serde_json::from_value(v).map(Segment::Record)),
    ("json", |v| serde_json::from_value(v).map(Segment::Json)),
    ("markdown", |v| serde_json::from_value(v).map(Segment::Markdown)),
    ("dice", |v| serde_json::from_value(v).map(Segment::Dice)),
    ("rps", |v| serde_json::from_value(v).map(Segment::Rps)),
    ("music", |v| serde_json::from_value(v).map(Segment::Music)),
    ("node", |v| serde_json::from_value(v).map(Segment::Node)),
    ("forward", |v| serde_json::from_value(v).map(Segment::Forward)),
    ("contact", |v| serde_json::from_value(v).map(Segment::Contact)),
];

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one `{type, data}` object.
///
/// A missing or null `data` is treated as an empty record, which kinds
/// without required fields (`dice`, `rps`) accept.
pub fn decode_segment(value: &Value) -> Result<Segment, CodecError> {
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingType)?;

    let decoder = DECODERS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, d)| *d)
        .ok_or_else(|| CodecError::UnknownMessageKind {
            tag: tag.to_owned(),
        })?;

    let data = match value.get("data") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(d) => d.clone(),
    };

    decoder(data).map_err(|err| match CodecError::from_serde(&err) {
        unknown @ CodecError::UnknownMessageKind { .. } => unknown,
        _ => CodecError::InvalidSegment {
            tag: tag.to_owned(),
            reason: err.to_string(),
        },
    })
}

/// Encode one segment as `{type, data}`.
pub fn encode_segment(segment: &Segment) -> Result<Value, CodecError> {
    serde_json::to_value(segment).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Encode a segment sequence as a JSON array, preserving order.
pub fn encode_message(segments: &[Segment]) -> Result<Value, CodecError> {
    segments
        .iter()
        .map(encode_segment)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Decode a segment array.
///
/// A bare string is accepted as a single text segment; some servers report
/// messages that way when configured for string format.
pub fn decode_message(value: &Value) -> Result<Vec<Segment>, CodecError> {
    match value {
        Value::Array(items) => items.iter().map(decode_segment).collect(),
        Value::String(text) => Ok(vec![Segment::text(text.clone())]),
        other => Err(CodecError::NotAMessage(format!(
            "expected an array of segments, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// serde glue
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a T,
}

fn tagged<S: Serializer, T: Serialize>(
    kind: &'static str,
    data: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Tagged { kind, data }.serialize(serializer)
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind().as_str();
        match self {
            Self::Text(d) => tagged(kind, d, serializer),
            Self::At(d) => tagged(kind, d, serializer),
            Self::Reply(d) => tagged(kind, d, serializer),
            Self::Face(d) => tagged(kind, d, serializer),
            Self::Mface(d) => tagged(kind, d, serializer),
            Self::Image(d) => tagged(kind, d, serializer),
            Self::File(d) | Self::Record(d) => tagged(kind, d, serializer),
            Self::Video(d) => tagged(kind, d, serializer),
            Self::Json(d) => tagged(kind, d, serializer),
            Self::Markdown(d) => tagged(kind, d, serializer),
            Self::Dice(d) => tagged(kind, d, serializer),
            Self::Rps(d) => tagged(kind, d, serializer),
            Self::Music(d) => tagged(kind, d, serializer),
            Self::Node(d) => tagged(kind, d, serializer),
            Self::Forward(d) => tagged(kind, d, serializer),
            Self::Contact(d) => tagged(kind, d, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_segment(&value).map_err(de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
