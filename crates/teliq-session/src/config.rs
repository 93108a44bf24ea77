//! Session configuration.

use std::time::Duration;

use teliq_settings::ConnectionSettings;

use crate::reconnect::ReconnectPolicy;

/// Runtime configuration of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Endpoint URL.
    pub url: String,
    /// Deadline for calls made through [`crate::Session::call`].
    pub call_timeout: Duration,
    /// Deadline for opening a link.
    pub connect_timeout: Duration,
    /// Reconnect schedule.
    pub reconnect: ReconnectPolicy,
    /// Event broadcast capacity.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&ConnectionSettings::default())
    }
}

impl From<&ConnectionSettings> for SessionConfig {
    fn from(s: &ConnectionSettings) -> Self {
        Self {
            url: s.url.clone(),
            call_timeout: s.call_timeout(),
            connect_timeout: s.connect_timeout(),
            reconnect: ReconnectPolicy {
                max_attempts: s.max_reconnect_attempts,
                unit: s.reconnect_unit(),
            },
            event_buffer: s.event_buffer.max(1),
        }
    }
}

impl SessionConfig {
    /// Config for `url` with default timings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Replace the default call deadline.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Replace the reconnect schedule.
    #[must_use]
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_settings() {
        let settings = ConnectionSettings {
            url: "ws://bot:6700".into(),
            call_timeout_ms: 1500,
            max_reconnect_attempts: 2,
            reconnect_unit_ms: 200,
            event_buffer: 0,
            ..ConnectionSettings::default()
        };
        let config = SessionConfig::from(&settings);
        assert_eq!(config.url, "ws://bot:6700");
        assert_eq!(config.call_timeout, Duration::from_millis(1500));
        assert_eq!(config.reconnect.max_attempts, 2);
        assert_eq!(config.reconnect.unit, Duration::from_millis(200));
        assert_eq!(config.event_buffer, 1);
    }

    #[test]
    fn defaults_match_settings() {
        let config = SessionConfig::new("ws://x");
        assert_eq!(config.url, "ws://x");
        assert_eq!(config.call_timeout, Duration::from_secs(5));
        assert_eq!(config.reconnect, ReconnectPolicy::default());
        assert_eq!(config.event_buffer, 256);
    }
}
