//! In-process transport for tests and simulation.
//!
//! [`MemoryTransport`] hands every opened link to a shared [`MemoryPeer`],
//! which plays the remote side: it reads the frames the session sends and
//! injects lifecycle events and inbound frames into the current link.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;

use super::{Headers, OutboundFrame, Transport, TransportEvent, TransportHandle};

struct Shared {
    auto_connect: AtomicBool,
    opens: AtomicUsize,
    link: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
    last_url: Mutex<Option<String>>,
    frames_tx: mpsc::UnboundedSender<OutboundFrame>,
    frames_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<OutboundFrame>>,
}

/// Transport whose remote side is a [`MemoryPeer`].
#[derive(Clone)]
pub struct MemoryTransport {
    shared: Arc<Shared>,
}

/// Remote side of a [`MemoryTransport`].
#[derive(Clone)]
pub struct MemoryPeer {
    shared: Arc<Shared>,
}

impl MemoryTransport {
    /// Transport whose links come up as soon as they are opened.
    pub fn new() -> (Self, MemoryPeer) {
        Self::with_auto_connect(true)
    }

    /// Transport whose links stay pending until [`MemoryPeer::connected`]
    /// is called when `auto_connect` is false.
    pub fn with_auto_connect(auto_connect: bool) -> (Self, MemoryPeer) {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            auto_connect: AtomicBool::new(auto_connect),
            opens: AtomicUsize::new(0),
            link: Mutex::new(None),
            last_url: Mutex::new(None),
            frames_tx,
            frames_rx: tokio::sync::Mutex::new(frames_rx),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MemoryPeer { shared },
        )
    }
}

impl Transport for MemoryTransport {
    fn open(&self, url: &str, events: mpsc::UnboundedSender<TransportEvent>) -> TransportHandle {
        let _ = self.shared.opens.fetch_add(1, Ordering::SeqCst);
        *self.shared.last_url.lock() = Some(url.to_owned());
        if self.shared.auto_connect.load(Ordering::SeqCst) {
            let _ = events.send(TransportEvent::Connected(Headers::new()));
        }
        *self.shared.link.lock() = Some(events);
        TransportHandle::new(self.shared.frames_tx.clone())
    }
}

impl MemoryPeer {
    /// Number of links opened so far.
    pub fn opens(&self) -> usize {
        self.shared.opens.load(Ordering::SeqCst)
    }

    /// URL of the most recently opened link.
    pub fn last_url(&self) -> Option<String> {
        self.shared.last_url.lock().clone()
    }

    /// Whether new links come up on their own.
    pub fn set_auto_connect(&self, auto_connect: bool) {
        self.shared.auto_connect.store(auto_connect, Ordering::SeqCst);
    }

    /// Inject an event into the current link. Returns false when no link is
    /// open or its session side has gone away.
    pub fn inject(&self, event: TransportEvent) -> bool {
        self.shared
            .link
            .lock()
            .as_ref()
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    /// Bring the current link up.
    pub fn connected(&self, headers: Headers) -> bool {
        self.inject(TransportEvent::Connected(headers))
    }

    /// Close the current link with a close frame.
    pub fn disconnect(&self, reason: &str, code: u16) -> bool {
        self.inject(TransportEvent::Disconnected {
            reason: reason.to_owned(),
            code,
        })
    }

    /// Fail the current link.
    pub fn error(&self, message: &str) -> bool {
        self.inject(TransportEvent::Error(message.to_owned()))
    }

    /// Drop the current link without a close frame.
    pub fn peer_closed(&self) -> bool {
        self.inject(TransportEvent::PeerClosed)
    }

    /// Deliver a text frame.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.inject(TransportEvent::Text(text.into()))
    }

    /// Deliver a JSON document as a text frame.
    pub fn send_json(&self, value: &Value) -> bool {
        self.send_text(value.to_string())
    }

    /// Deliver a binary frame.
    pub fn send_binary(&self, bytes: Vec<u8>) -> bool {
        self.inject(TransportEvent::Binary(bytes))
    }

    /// Next frame the session sent on any link.
    pub async fn next_frame(&self) -> Option<OutboundFrame> {
        self.shared.frames_rx.lock().await.recv().await
    }

    /// Next outbound text frame parsed as JSON, skipping other frames.
    pub async fn next_request(&self) -> Option<Value> {
        loop {
            match self.next_frame().await? {
                OutboundFrame::Text(text) => {
                    if let Ok(value) = serde_json::from_str(&text) {
                        return Some(value);
                    }
                }
                OutboundFrame::Binary(_) | OutboundFrame::Close => {}
            }
        }
    }

    /// Reply `ok` to a request document with `data`.
    pub fn respond_ok(&self, request: &Value, data: Value) -> bool {
        self.send_json(&serde_json::json!({
            "status": "ok",
            "retcode": 0,
            "data": data,
            "message": "",
            "wording": "",
            "echo": request["echo"],
        }))
    }

    /// Reply `failed` to a request document.
    pub fn respond_failed(&self, request: &Value, retcode: i64, message: &str) -> bool {
        self.send_json(&serde_json::json!({
            "status": "failed",
            "retcode": retcode,
            "data": null,
            "message": message,
            "wording": message,
            "echo": request["echo"],
        }))
    }
}
