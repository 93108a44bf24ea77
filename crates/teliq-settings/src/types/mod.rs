//! Settings schema.

mod connection;
mod logging;

pub use connection::ConnectionSettings;
pub use logging::{LogFormat, LoggingSettings};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeliqSettings {
    /// Remote endpoint and session timing.
    pub connection: ConnectionSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

impl TeliqSettings {
    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        let c = &self.connection;
        if c.url.is_empty() {
            return Err(SettingsError::InvalidValue("connection.url is empty".into()));
        }
        if !(c.url.starts_with("ws://") || c.url.starts_with("wss://")) {
            return Err(SettingsError::InvalidValue(format!(
                "connection.url must be ws:// or wss://, got {}",
                c.url
            )));
        }
        if c.call_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "connection.callTimeoutMs must be > 0".into(),
            ));
        }
        if c.event_buffer == 0 {
            return Err(SettingsError::InvalidValue(
                "connection.eventBuffer must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(TeliqSettings::default()).unwrap();
        assert_eq!(v["connection"]["url"], "ws://127.0.0.1:3001");
        assert_eq!(v["connection"]["callTimeoutMs"], 5000);
        assert_eq!(v["connection"]["maxReconnectAttempts"], 5);
        assert_eq!(v["logging"]["level"], "info");
    }

    #[test]
    fn partial_document_fills_defaults() {
        let s: TeliqSettings =
            serde_json::from_value(json!({"connection": {"url": "ws://bot:6700"}})).unwrap();
        assert_eq!(s.connection.url, "ws://bot:6700");
        assert_eq!(s.connection.reconnect_unit_ms, 1000);
        assert_eq!(s.logging, LoggingSettings::default());
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(TeliqSettings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut s = TeliqSettings::default();
        s.connection.url = "http://x".into();
        assert!(s.validate().is_err());

        let mut s = TeliqSettings::default();
        s.connection.call_timeout_ms = 0;
        assert!(s.validate().is_err());

        let mut s = TeliqSettings::default();
        s.connection.event_buffer = 0;
        assert!(s.validate().is_err());
    }
}
