//! Codec errors.

use teliq_core::CallError;
use thiserror::Error;

/// Leading text of the [`CodecError::UnknownMessageKind`] message. Must match
/// its `#[error]` string, which [`CodecError::from_serde`] parses back.
const UNKNOWN_KIND_PREFIX: &str = "unknown message kind `";

/// Errors from encoding or decoding message segments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The `type` tag is not one of the supported kinds.
    ///
    /// Serde errors only carry text, so this message is how the tag crosses
    /// a nested `Deserialize`. Changing it requires updating
    /// `UNKNOWN_KIND_PREFIX`.
    #[error("unknown message kind `{tag}`")]
    UnknownMessageKind {
        /// The offending tag.
        tag: String,
    },

    /// The segment has no string `type` field.
    #[error("segment is missing a string `type` field")]
    MissingType,

    /// The `data` record does not match the kind's shape.
    #[error("invalid `{tag}` segment: {reason}")]
    InvalidSegment {
        /// The segment's tag.
        tag: String,
        /// Why the data record was rejected.
        reason: String,
    },

    /// The value is not a segment array.
    #[error("not a message: {0}")]
    NotAMessage(String),

    /// An inbound event does not have the message event shape.
    #[error("invalid message event: {0}")]
    InvalidEvent(String),

    /// Serialization failed.
    #[error("failed to encode segment: {0}")]
    Encode(String),
}

impl CodecError {
    /// Recover an unknown-kind failure from a serde error raised while a
    /// segment was decoded inside a larger document.
    ///
    /// The tag is read back from the error text between
    /// `UNKNOWN_KIND_PREFIX` and the closing backtick.
    pub fn from_serde(err: &serde_json::Error) -> Self {
        let text = err.to_string();
        if let Some(start) = text.find(UNKNOWN_KIND_PREFIX) {
            let rest = &text[start + UNKNOWN_KIND_PREFIX.len()..];
            if let Some(end) = rest.find('`') {
                return Self::UnknownMessageKind {
                    tag: rest[..end].to_owned(),
                };
            }
        }
        Self::InvalidEvent(text)
    }
}

impl From<CodecError> for CallError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnknownMessageKind { tag } => Self::UnknownMessageKind { tag },
            CodecError::Encode(reason) => Self::EncodingFailed(reason),
            other => Self::DecodingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn display() {
        let err = CodecError::UnknownMessageKind {
            tag: "poke".into(),
        };
        assert_eq!(err.to_string(), "unknown message kind `poke`");

        let err = CodecError::InvalidSegment {
            tag: "at".into(),
            reason: "missing field `qq`".into(),
        };
        assert_eq!(err.to_string(), "invalid `at` segment: missing field `qq`");
    }

    #[test]
    fn unknown_kind_maps_to_call_error() {
        let err: CallError = CodecError::UnknownMessageKind { tag: "x".into() }.into();
        assert_eq!(err, CallError::UnknownMessageKind { tag: "x".into() });
    }

    #[test]
    fn other_errors_map_to_decoding_failed() {
        let err: CallError = CodecError::MissingType.into();
        assert_matches!(err, CallError::DecodingFailed(_));
        let err: CallError = CodecError::Encode("boom".into()).into();
        assert_matches!(err, CallError::EncodingFailed(_));
    }

    #[test]
    fn from_serde_recovers_tag() {
        let err = <serde_json::Error as serde::de::Error>::custom(
            "unknown message kind `not_a_real_kind`",
        );
        assert_eq!(
            CodecError::from_serde(&err),
            CodecError::UnknownMessageKind {
                tag: "not_a_real_kind".into()
            }
        );
    }

    #[test]
    fn unknown_kind_display_parses_back() {
        let original = CodecError::UnknownMessageKind {
            tag: "poke".into(),
        };
        let err = <serde_json::Error as serde::de::Error>::custom(&original);
        assert_eq!(CodecError::from_serde(&err), original);
    }

    #[test]
    fn from_serde_reads_nested_segment_errors() {
        let err = serde_json::from_value::<Vec<crate::Segment>>(serde_json::json!([
            {"type": "text", "data": {"text": "a"}},
            {"type": "shake", "data": {}}
        ]))
        .unwrap_err();
        assert_eq!(
            CodecError::from_serde(&err),
            CodecError::UnknownMessageKind {
                tag: "shake".into()
            }
        );
    }

    #[test]
    fn from_serde_falls_back() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert_matches!(CodecError::from_serde(&err), CodecError::InvalidEvent(_));
    }
}
