//! Connection lifecycle states.

use std::fmt;

/// Lifecycle state of a session.
///
/// ```text
/// Disconnected --connect--> Connecting --up--> Connected
/// Connected --lost--> Reconnecting --backoff--> Connecting
/// Reconnecting --exhausted--> Closed
/// any --disconnect--> Closed --connect--> Connecting
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Never connected.
    #[default]
    Disconnected,
    /// A link is being opened.
    Connecting,
    /// A link is up; calls are accepted.
    Connected,
    /// The link dropped; a reconnect is scheduled.
    Reconnecting,
    /// Closed locally or reconnects exhausted. Only `connect` leaves this state.
    Closed,
}

impl ConnectionState {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Closed => "closed",
        }
    }

    /// Whether a connection attempt is already outstanding or established.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected | Self::Reconnecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(ConnectionState::Reconnecting.to_string(), "reconnecting");
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn active_states() {
        assert!(ConnectionState::Connecting.is_active());
        assert!(ConnectionState::Connected.is_active());
        assert!(ConnectionState::Reconnecting.is_active());
        assert!(!ConnectionState::Disconnected.is_active());
        assert!(!ConnectionState::Closed.is_active());
    }
}
