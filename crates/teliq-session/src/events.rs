//! Session events delivered to subscribers.

use crate::frame::{Event, Heartbeat};
use crate::state::ConnectionState;
use crate::transport::Headers;

/// Notification broadcast by a session.
///
/// Subscribers that fall behind by more than the configured buffer miss the
/// oldest events (`broadcast` lag semantics).
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The link came up.
    Connected {
        /// Handshake response headers.
        headers: Headers,
    },
    /// The remote side closed the link.
    Disconnected {
        /// Close reason.
        reason: String,
        /// Close code.
        code: u16,
    },
    /// Asynchronous event from the remote side.
    Event(Event),
    /// Liveness heartbeat.
    Heartbeat(Heartbeat),
    /// Text frame that matched no other kind.
    Unrecognized(String),
    /// Binary frame.
    Binary(Vec<u8>),
    /// The link failed.
    Error(String),
    /// The link was closed locally.
    Cancelled,
    /// The remote side went away without a close frame.
    PeerClosed,
    /// The lifecycle state changed.
    StateChanged {
        /// Previous state.
        from: ConnectionState,
        /// New state.
        to: ConnectionState,
    },
    /// Reconnects gave up; the session is now closed.
    ReconnectExhausted {
        /// Attempts made.
        attempts: u32,
    },
}
