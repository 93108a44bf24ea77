//! WebSocket transport over `tokio-tungstenite`.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use super::{Headers, OutboundFrame, Transport, TransportError, TransportEvent, TransportHandle};

/// Opens one WebSocket connection per link.
#[derive(Clone, Debug)]
pub struct WebSocketTransport {
    connect_timeout: Duration,
}

impl WebSocketTransport {
    /// Transport whose handshakes give up after `connect_timeout`.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, url: &str, events: mpsc::UnboundedSender<TransportEvent>) -> TransportHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tokio::spawn(run_link(
            url.to_owned(),
            self.connect_timeout,
            rx,
            events,
        ));
        TransportHandle::new(tx)
    }
}

#[allow(clippy::cast_possible_truncation)]
async fn run_link(
    url: String,
    connect_timeout: Duration,
    mut outbound: mpsc::UnboundedReceiver<OutboundFrame>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    debug!(%url, "opening websocket");
    let (ws, response) = match tokio::time::timeout(connect_timeout, connect_async(url.as_str())).await {
        Ok(Ok(pair)) => pair,
        Ok(Err(e)) => {
            let err = TransportError::Connect(e.to_string());
            let _ = events.send(TransportEvent::Error(err.to_string()));
            return;
        }
        Err(_) => {
            let err = TransportError::ConnectTimeout {
                timeout_ms: connect_timeout.as_millis() as u64,
            };
            let _ = events.send(TransportEvent::Error(err.to_string()));
            return;
        }
    };

    let headers: Headers = response
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_owned(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    if events.send(TransportEvent::Connected(headers)).is_err() {
        return;
    }

    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let msg = match frame {
                    Some(OutboundFrame::Text(text)) => Message::Text(text.into()),
                    Some(OutboundFrame::Binary(bytes)) => Message::Binary(bytes.into()),
                    Some(OutboundFrame::Close) | None => {
                        let _ = sink.send(Message::Close(None)).await;
                        let _ = sink.close().await;
                        let _ = events.send(TransportEvent::Cancelled);
                        return;
                    }
                };
                if let Err(e) = sink.send(msg).await {
                    warn!(%url, error = %e, "websocket write failed");
                    let _ = events.send(TransportEvent::Error(TransportError::Io(e.to_string()).to_string()));
                    return;
                }
            }
            msg = stream.next() => {
                let event = match msg {
                    Some(Ok(Message::Text(text))) => TransportEvent::Text(text.as_str().to_owned()),
                    Some(Ok(Message::Binary(bytes))) => TransportEvent::Binary(bytes.to_vec()),
                    Some(Ok(Message::Close(Some(frame)))) => {
                        let _ = events.send(TransportEvent::Disconnected {
                            reason: frame.reason.as_str().to_owned(),
                            code: u16::from(frame.code),
                        });
                        return;
                    }
                    Some(Ok(Message::Close(None))) | None => {
                        let _ = events.send(TransportEvent::PeerClosed);
                        return;
                    }
                    // ping/pong are answered by tungstenite
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        let _ = events.send(TransportEvent::Error(TransportError::Io(e.to_string()).to_string()));
                        return;
                    }
                };
                if events.send(event).is_err() {
                    return;
                }
            }
        }
    }
}
