//! Ordered segment sequences.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec;
use crate::error::CodecError;
use crate::segment::Segment;

/// A chat message: an ordered sequence of segments.
///
/// ```ignore
/// let msg = Message::new().reply(998).at(10001).text(" see above");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Vec<Segment>);

impl Message {
    /// Empty message.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a text segment.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.segment(Segment::text(text))
    }

    /// Append a mention.
    #[must_use]
    pub fn at(self, qq: impl ToString) -> Self {
        self.segment(Segment::at(qq))
    }

    /// Append a quote of an earlier message.
    #[must_use]
    pub fn reply(self, id: impl ToString) -> Self {
        self.segment(Segment::reply(id))
    }

    /// Append a built-in face.
    #[must_use]
    pub fn face(self, id: impl ToString) -> Self {
        self.segment(Segment::face(id))
    }

    /// Append an image.
    #[must_use]
    pub fn image(self, file: impl Into<String>) -> Self {
        self.segment(Segment::image(file))
    }

    /// Append any segment.
    #[must_use]
    pub fn segment(mut self, segment: Segment) -> Self {
        self.0.push(segment);
        self
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Iterate segments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the message has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated text of all text segments.
    pub fn plain_text(&self) -> String {
        self.0.iter().filter_map(Segment::as_text).collect()
    }

    /// Take the segments out.
    pub fn into_inner(self) -> Vec<Segment> {
        self.0
    }

    /// Decode from a segment array (or a bare string).
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        codec::decode_message(value).map(Self)
    }

    /// Encode as a segment array.
    pub fn to_value(&self) -> Result<Value, CodecError> {
        codec::encode_message(&self.0)
    }
}

impl From<Vec<Segment>> for Message {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl From<Segment> for Message {
    fn from(segment: Segment) -> Self {
        Self(vec![segment])
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self(vec![Segment::text(text)])
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(vec![Segment::text(text)])
    }
}

impl FromIterator<Segment> for Message {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Message {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_chain_keeps_order() {
        let msg = Message::new().reply(998).at(10001).text(" hi").face(1);
        let kinds: Vec<_> = msg.iter().map(|s| s.kind().as_str()).collect();
        assert_eq!(kinds, ["reply", "at", "text", "face"]);
    }

    #[test]
    fn plain_text_joins_text_segments() {
        let msg = Message::new().text("a").at(1).text("b");
        assert_eq!(msg.plain_text(), "ab");
    }

    #[test]
    fn serializes_as_array() {
        let msg = Message::from("hello");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!([{"type": "text", "data": {"text": "hello"}}])
        );
        assert_eq!(msg.to_value().unwrap(), serde_json::to_value(&msg).unwrap());
    }

    #[test]
    fn deserializes_from_array() {
        let msg: Message = serde_json::from_value(json!([
            {"type": "at", "data": {"qq": "1"}},
            {"type": "text", "data": {"text": " yo"}}
        ]))
        .unwrap();
        assert_eq!(msg.len(), 2);
        assert_eq!(msg, Message::new().at(1).text(" yo"));
    }

    #[test]
    fn collect_and_into_iter() {
        let msg: Message = vec![Segment::text("x"), Segment::dice()].into_iter().collect();
        assert!(!msg.is_empty());
        assert_eq!(msg.into_iter().count(), 2);
    }
}
