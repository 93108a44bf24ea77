//! # teliq-message
//!
//! Chat message content as an ordered sequence of tagged segments.
//!
//! - [`Segment`]: closed sum type over every supported part kind
//! - [`codec`]: `{type, data}` encoding and table-driven decoding
//! - [`Message`]: ordered segment sequence with chaining builders
//! - [`MessageEvent`]: typed view of inbound `message` events

#![deny(unsafe_code)]

pub mod codec;
pub mod error;
pub mod event;
mod lenient;
pub mod message;
pub mod segment;

pub use codec::{decode_message, decode_segment, encode_message, encode_segment};
pub use error::CodecError;
pub use event::{MessageEvent, MessageType, Sender};
pub use message::Message;
pub use segment::*;
