//! Connection session.
//!
//! A [`Session`] owns one logical connection: the current transport link,
//! the lifecycle state, the reconnect schedule and the pending call table.
//! Each link reports on its own channel, drained by one pump task; events
//! from a superseded link are dropped by comparing link generations.
//!
//! Background tasks hold only weak references to the session, so dropping
//! the last [`Session`] handle tears everything down.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use teliq_core::{Action, CallError, CallResult, EchoId};
use teliq_message::CodecError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::envelope::Envelope;
use crate::events::SessionEvent;
use crate::frame::{self, InboundFrame};
use crate::pending::PendingTable;
use crate::state::ConnectionState;
use crate::transport::{Transport, TransportEvent, TransportHandle, WebSocketTransport};

/// Handle to a connection session. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    pending: PendingTable,
    link: Mutex<Link>,
    state_tx: watch::Sender<ConnectionState>,
    events: broadcast::Sender<SessionEvent>,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Link {
    state: ConnectionState,
    generation: u64,
    handle: Option<TransportHandle>,
    attempts: u32,
    reconnect: Option<CancellationToken>,
}

impl Session {
    /// Session over `transport`. Nothing is opened until [`Session::connect`].
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                pending: PendingTable::new(),
                link: Mutex::new(Link::default()),
                state_tx,
                events,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Session over a WebSocket transport.
    pub fn websocket(config: SessionConfig) -> Self {
        let transport = Arc::new(WebSocketTransport::new(config.connect_timeout));
        Self::new(config, transport)
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Start connecting.
    ///
    /// No-op while an attempt is outstanding or a link is up, and after
    /// [`Session::shutdown`]. From [`ConnectionState::Closed`] the reconnect
    /// counter starts over. Must be called within a tokio runtime.
    pub fn connect(&self) {
        if self.inner.cancel.is_cancelled() {
            warn!(url = %self.inner.config.url, "connect after shutdown ignored");
            return;
        }
        let mut link = self.inner.link.lock();
        match link.state {
            ConnectionState::Connecting
            | ConnectionState::Connected
            | ConnectionState::Reconnecting => {
                debug!(state = %link.state, "connect ignored");
                return;
            }
            ConnectionState::Closed => link.attempts = 0,
            ConnectionState::Disconnected => {}
        }
        self.inner.open_link(&mut link);
    }

    /// Close the connection and fail pending calls with [`CallError::ConnectionLost`].
    ///
    /// Suppresses reconnection until the next [`Session::connect`].
    pub fn disconnect(&self) {
        self.inner.close();
    }

    /// [`Session::disconnect`] plus cancellation of every background task.
    ///
    /// The session cannot be reconnected afterwards.
    pub fn shutdown(&self) {
        self.inner.close();
        self.inner.cancel.cancel();
        info!(url = %self.inner.config.url, "session shut down");
    }

    /// Wait until the session is connected.
    ///
    /// Fails with [`CallError::NotConnected`] if the session closes first and
    /// with [`CallError::Timeout`] if `timeout` elapses.
    pub async fn wait_connected(&self, timeout: Duration) -> CallResult<()> {
        let mut rx = self.inner.state_tx.subscribe();
        let waited = tokio::time::timeout(
            timeout,
            rx.wait_for(|s| matches!(s, ConnectionState::Connected | ConnectionState::Closed)),
        )
        .await;
        match waited {
            Ok(Ok(state)) if *state == ConnectionState::Connected => Ok(()),
            Ok(_) => Err(CallError::NotConnected),
            Err(_) => Err(CallError::Timeout {
                action: "connect".into(),
                timeout_ms: duration_ms(timeout),
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.inner.link.lock().state
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Number of calls awaiting a response.
    pub fn pending_calls(&self) -> usize {
        self.inner.pending.len()
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    // ─── Calls ───────────────────────────────────────────────────────────

    /// Send a raw text frame outside the call protocol.
    pub fn send_text(&self, text: impl Into<String>) -> CallResult<()> {
        let handle = self.connected_handle()?;
        handle
            .send_text(text.into())
            .map_err(|_| CallError::ConnectionLost)
    }

    /// Send a raw binary frame.
    pub fn send_binary(&self, bytes: impl Into<Vec<u8>>) -> CallResult<()> {
        let handle = self.connected_handle()?;
        handle
            .send_binary(bytes.into())
            .map_err(|_| CallError::ConnectionLost)
    }

    fn connected_handle(&self) -> CallResult<TransportHandle> {
        let link = self.inner.link.lock();
        if link.state != ConnectionState::Connected {
            return Err(CallError::NotConnected);
        }
        link.handle.clone().ok_or(CallError::NotConnected)
    }

    /// Call a typed action with the default deadline.
    pub async fn call<A: Action>(&self, action: &A) -> CallResult<A::Output> {
        self.call_with(A::NAME, action, self.inner.config.call_timeout)
            .await
    }

    /// Call `action` with serializable params, decoding `data` into `R`.
    pub async fn call_with<P, R>(&self, action: &str, params: &P, timeout: Duration) -> CallResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params =
            serde_json::to_value(params).map_err(|e| CallError::EncodingFailed(e.to_string()))?;
        let data = self.call_raw(action, params, timeout).await?;
        decode_data(data)
    }

    /// Call `action` with raw params, returning the raw `data`.
    pub async fn call_raw(&self, action: &str, params: Value, timeout: Duration) -> CallResult<Value> {
        let echo = EchoId::new();
        let text = Envelope::new(action, &params, &echo).to_text()?;
        let pending = &self.inner.pending;

        // Register under the link lock so a concurrent link loss either
        // refuses the call or drains it.
        let (handle, mut rx) = {
            let link = self.inner.link.lock();
            if link.state != ConnectionState::Connected {
                return Err(CallError::NotConnected);
            }
            let handle = link.handle.clone().ok_or(CallError::NotConnected)?;
            (handle, pending.register(echo.clone(), action)?)
        };
        let _guard = PendingGuard {
            pending,
            echo: &echo,
        };

        debug!(action, %echo, "sending call");
        if handle.send_text(text).is_err() {
            let _ = pending.resolve(&echo, Err(CallError::ConnectionLost));
        }

        match tokio::time::timeout(timeout, &mut rx).await {
            Ok(result) => result.unwrap_or(Err(CallError::ConnectionLost)),
            Err(_) => {
                let err = CallError::Timeout {
                    action: action.to_owned(),
                    timeout_ms: duration_ms(timeout),
                };
                if pending.resolve(&echo, Err(err)) {
                    warn!(action, %echo, "call timed out");
                }
                // whichever resolution removed the entry has sent by now
                rx.await.unwrap_or(Err(CallError::ConnectionLost))
            }
        }
    }
}

/// Removes the entry if the caller's future is dropped before resolution.
struct PendingGuard<'a> {
    pending: &'a PendingTable,
    echo: &'a EchoId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.pending.discard(self.echo) {
            debug!(echo = %self.echo, "call abandoned by caller");
        }
    }
}

fn decode_data<R: DeserializeOwned>(data: Value) -> CallResult<R> {
    // null data decodes as `{}` for record-shaped results
    let decoded = if data.is_null() {
        serde_json::from_value(Value::Null)
            .or_else(|_| serde_json::from_value(Value::Object(Map::new())))
    } else {
        serde_json::from_value(data)
    };
    decoded.map_err(|e| match CodecError::from_serde(&e) {
        CodecError::UnknownMessageKind { tag } => CallError::UnknownMessageKind { tag },
        _ => CallError::DecodingFailed(e.to_string()),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

impl Inner {
    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_state(&self, link: &mut Link, to: ConnectionState) {
        if link.state == to {
            return;
        }
        let from = link.state;
        link.state = to;
        let _ = self.state_tx.send_replace(to);
        info!(%from, %to, url = %self.config.url, "connection state changed");
        self.emit(SessionEvent::StateChanged { from, to });
    }

    fn open_link(self: &Arc<Self>, link: &mut Link) {
        link.generation += 1;
        let generation = link.generation;
        self.set_state(link, ConnectionState::Connecting);

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.transport.open(&self.config.url, tx);
        if let Some(old) = link.handle.replace(handle) {
            old.close();
        }

        let _ = tokio::spawn(pump(
            Arc::downgrade(self),
            generation,
            rx,
            self.cancel.clone(),
        ));
    }

    fn close(&self) {
        let mut link = self.link.lock();
        link.generation += 1;
        if let Some(token) = link.reconnect.take() {
            token.cancel();
        }
        if let Some(handle) = link.handle.take() {
            handle.close();
        }
        self.set_state(&mut link, ConnectionState::Closed);
        drop(link);

        let drained = self.pending.drain(|| CallError::ConnectionLost);
        info!(drained, url = %self.config.url, "disconnected");
    }

    /// Returns false once the link is finished or superseded.
    fn on_transport_event(self: &Arc<Self>, generation: u64, event: TransportEvent) -> bool {
        let mut link = self.link.lock();
        if link.generation != generation {
            debug!(generation, current = link.generation, "event from stale link ignored");
            return false;
        }

        match event {
            TransportEvent::Connected(headers) => {
                link.attempts = 0;
                self.set_state(&mut link, ConnectionState::Connected);
                drop(link);
                self.emit(SessionEvent::Connected { headers });
                true
            }
            TransportEvent::Text(text) => {
                drop(link);
                self.dispatch_text(&text);
                true
            }
            TransportEvent::Binary(bytes) => {
                drop(link);
                debug!(len = bytes.len(), "binary frame");
                self.emit(SessionEvent::Binary(bytes));
                true
            }
            TransportEvent::Disconnected { reason, code } => {
                warn!(%reason, code, "link closed by peer");
                self.emit(SessionEvent::Disconnected { reason, code });
                self.link_lost(&mut link);
                false
            }
            TransportEvent::Error(message) => {
                warn!(error = %message, url = %self.config.url, "link failed");
                self.emit(SessionEvent::Error(message));
                self.link_lost(&mut link);
                false
            }
            TransportEvent::PeerClosed => {
                warn!(url = %self.config.url, "peer went away");
                self.emit(SessionEvent::PeerClosed);
                self.link_lost(&mut link);
                false
            }
            TransportEvent::Cancelled => {
                info!(url = %self.config.url, "link cancelled");
                link.handle = None;
                self.set_state(&mut link, ConnectionState::Closed);
                drop(link);
                let drained = self.pending.drain(|| CallError::ConnectionLost);
                if drained > 0 {
                    warn!(drained, "pending calls failed: link cancelled");
                }
                self.emit(SessionEvent::Cancelled);
                false
            }
        }
    }

    fn link_lost(self: &Arc<Self>, link: &mut Link) {
        if let Some(handle) = link.handle.take() {
            handle.close();
        }
        let drained = self.pending.drain(|| CallError::ConnectionLost);
        if drained > 0 {
            warn!(drained, "pending calls failed: connection lost");
        }

        let attempt = link.attempts + 1;
        match self.config.reconnect.delay_for(attempt) {
            Some(delay) => {
                link.attempts = attempt;
                self.set_state(link, ConnectionState::Reconnecting);
                info!(
                    attempt,
                    max = self.config.reconnect.max_attempts,
                    delay_ms = duration_ms(delay),
                    "reconnect scheduled"
                );
                self.schedule_reconnect(link, delay);
            }
            None => {
                let attempts = link.attempts;
                self.set_state(link, ConnectionState::Closed);
                error!(attempts, url = %self.config.url, "reconnect attempts exhausted");
                self.emit(SessionEvent::ReconnectExhausted { attempts });
            }
        }
    }

    fn schedule_reconnect(self: &Arc<Self>, link: &mut Link, delay: Duration) {
        let token = self.cancel.child_token();
        if let Some(old) = link.reconnect.replace(token.clone()) {
            old.cancel();
        }
        let weak = Arc::downgrade(self);
        let generation = link.generation;

        let _ = tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Some(inner) = weak.upgrade() {
                        inner.reconnect_now(generation);
                    }
                }
            }
        });
    }

    fn reconnect_now(self: &Arc<Self>, generation: u64) {
        let mut link = self.link.lock();
        if link.state != ConnectionState::Reconnecting || link.generation != generation {
            return;
        }
        link.reconnect = None;
        debug!(attempt = link.attempts, "reconnecting");
        self.open_link(&mut link);
    }

    fn dispatch_text(&self, text: &str) {
        match frame::classify(text, |echo| self.pending.contains(echo)) {
            InboundFrame::CallResponse(response) => {
                let echo = response.echo.clone();
                if !self.pending.resolve(&echo, response.into_result()) {
                    debug!(%echo, "response arrived after its call completed");
                }
            }
            InboundFrame::Event(event) => {
                debug!(post_type = %event.post_type, "event");
                self.emit(SessionEvent::Event(event));
            }
            InboundFrame::Heartbeat(heartbeat) => {
                debug!(interval = heartbeat.interval, "heartbeat");
                self.emit(SessionEvent::Heartbeat(heartbeat));
            }
            InboundFrame::Unrecognized(text) => {
                debug!(len = text.len(), "unrecognized frame");
                self.emit(SessionEvent::Unrecognized(text));
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel.cancel();
        let link = self.link.get_mut();
        if let Some(token) = link.reconnect.take() {
            token.cancel();
        }
        if let Some(handle) = link.handle.take() {
            handle.close();
        }
        let _ = self.pending.drain(|| CallError::ConnectionLost);
    }
}

async fn pump(
    inner: Weak<Inner>,
    generation: u64,
    mut rx: mpsc::UnboundedReceiver<TransportEvent>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            event = rx.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };
        let Some(inner) = inner.upgrade() else { break };
        if !inner.on_transport_event(generation, event) {
            break;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
