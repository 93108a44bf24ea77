//! Connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Remote endpoint, call deadlines and reconnect policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionSettings {
    /// WebSocket endpoint of the bot-control service.
    pub url: String,
    /// Default deadline for a remote call.
    pub call_timeout_ms: u64,
    /// Deadline for opening the transport.
    pub connect_timeout_ms: u64,
    /// Reconnect attempts before giving up. `0` disables reconnection.
    pub max_reconnect_attempts: u32,
    /// Reconnect delay step; attempt `n` waits `n * unit`.
    pub reconnect_unit_ms: u64,
    /// Capacity of the session event broadcast channel.
    pub event_buffer: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:3001".to_string(),
            call_timeout_ms: 5_000,
            connect_timeout_ms: 5_000,
            max_reconnect_attempts: 5,
            reconnect_unit_ms: 1_000,
            event_buffer: 256,
        }
    }
}

impl ConnectionSettings {
    /// Default call deadline.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Transport open deadline.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Reconnect delay step.
    pub fn reconnect_unit(&self) -> Duration {
        Duration::from_millis(self.reconnect_unit_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConnectionSettings::default();
        assert_eq!(c.url, "ws://127.0.0.1:3001");
        assert_eq!(c.call_timeout(), Duration::from_secs(5));
        assert_eq!(c.connect_timeout(), Duration::from_secs(5));
        assert_eq!(c.max_reconnect_attempts, 5);
        assert_eq!(c.reconnect_unit(), Duration::from_secs(1));
        assert_eq!(c.event_buffer, 256);
    }
}
