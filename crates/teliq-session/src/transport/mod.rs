//! Duplex message transport seam.
//!
//! A [`Transport`] opens one link per call to [`Transport::open`]. The link
//! reports lifecycle and inbound frames on the supplied channel and accepts
//! outbound frames through the returned [`TransportHandle`]. The session
//! never touches sockets directly.

pub mod memory;
pub mod websocket;

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::mpsc;

pub use memory::{MemoryPeer, MemoryTransport};
pub use websocket::WebSocketTransport;

/// Response headers reported when a link comes up.
pub type Headers = HashMap<String, String>;

/// Lifecycle and inbound frame notifications from one link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link is up.
    Connected(Headers),
    /// The remote side closed the link with a close frame.
    Disconnected {
        /// Close reason.
        reason: String,
        /// Close code.
        code: u16,
    },
    /// Inbound text frame.
    Text(String),
    /// Inbound binary frame.
    Binary(Vec<u8>),
    /// The link failed (including failure to open).
    Error(String),
    /// The remote side went away without a close frame.
    PeerClosed,
    /// The link was closed locally.
    Cancelled,
}

/// Frame queued for the link's writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Text frame.
    Text(String),
    /// Binary frame.
    Binary(Vec<u8>),
    /// Close the link.
    Close,
}

/// Transport adapter failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The link's writer has gone away.
    #[error("transport link is closed")]
    Closed,
    /// Opening the link failed.
    #[error("failed to connect: {0}")]
    Connect(String),
    /// Opening the link did not finish in time.
    #[error("connect timed out after {timeout_ms}ms")]
    ConnectTimeout {
        /// How long we waited.
        timeout_ms: u64,
    },
    /// Reading or writing an open link failed.
    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Sending half of one link.
#[derive(Clone, Debug)]
pub struct TransportHandle {
    tx: mpsc::UnboundedSender<OutboundFrame>,
}

impl TransportHandle {
    /// Wrap the link's outbound queue.
    pub fn new(tx: mpsc::UnboundedSender<OutboundFrame>) -> Self {
        Self { tx }
    }

    /// Queue a text frame.
    pub fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.tx
            .send(OutboundFrame::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    /// Queue a binary frame.
    pub fn send_binary(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.tx
            .send(OutboundFrame::Binary(bytes))
            .map_err(|_| TransportError::Closed)
    }

    /// Ask the link to close. A link that is already gone is ignored.
    pub fn close(&self) {
        let _ = self.tx.send(OutboundFrame::Close);
    }

    /// Whether the link's writer is still accepting frames.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Opens links to a remote endpoint.
///
/// `open` must not block: adapters spawn their I/O onto the current tokio
/// runtime and report progress through `events`.
pub trait Transport: Send + Sync + 'static {
    /// Open a new link to `url`.
    fn open(&self, url: &str, events: mpsc::UnboundedSender<TransportEvent>) -> TransportHandle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(TransportError::Closed.to_string(), "transport link is closed");
        assert_eq!(
            TransportError::ConnectTimeout { timeout_ms: 5000 }.to_string(),
            "connect timed out after 5000ms"
        );
        assert!(
            TransportError::Connect("refused".into())
                .to_string()
                .contains("refused")
        );
    }

    #[test]
    fn handle_reports_closed_link() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = TransportHandle::new(tx);
        assert!(handle.is_open());
        handle.send_text("x".into()).unwrap();
        drop(rx);
        assert!(!handle.is_open());
        assert_eq!(handle.send_text("y".into()), Err(TransportError::Closed));
        assert_eq!(handle.send_binary(vec![1]), Err(TransportError::Closed));
        handle.close();
    }
}
