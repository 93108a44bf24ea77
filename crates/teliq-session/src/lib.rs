//! # teliq-session
//!
//! Connection session engine for a OneBot-11 compatible bot-control service.
//!
//! - [`Session`]: connection lifecycle, reconnection and the call surface
//! - [`pending::PendingTable`]: echo → waiting caller correlation
//! - [`frame::classify`]: call response / event / heartbeat / unrecognized
//! - [`transport`]: the duplex transport seam with WebSocket and in-memory
//!   adapters
//!
//! ```ignore
//! let session = Session::websocket(SessionConfig::new("ws://127.0.0.1:3001"));
//! session.connect();
//! session.wait_connected(Duration::from_secs(5)).await?;
//! let status: Value = session.call_raw("get_status", json!({}), Duration::from_secs(5)).await?;
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod envelope;
pub mod events;
pub mod frame;
pub mod pending;
pub mod reconnect;
pub mod session;
pub mod state;
pub mod transport;

pub use config::SessionConfig;
pub use envelope::{CallResponse, Envelope};
pub use events::SessionEvent;
pub use frame::{Event, Heartbeat, InboundFrame, classify};
pub use pending::PendingTable;
pub use reconnect::ReconnectPolicy;
pub use session::Session;
pub use state::ConnectionState;
pub use transport::{
    MemoryPeer, MemoryTransport, Transport, TransportError, TransportEvent, TransportHandle,
    WebSocketTransport,
};
