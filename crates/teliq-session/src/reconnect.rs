//! Reconnect backoff.

use std::time::Duration;

/// Linear, capped reconnect schedule: attempt `n` waits `n * unit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts before the session gives up. `0` disables reconnection.
    pub max_attempts: u32,
    /// Delay step.
    pub unit: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            unit: Duration::from_secs(1),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before 1-based `attempt`, or `None` once attempts are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        (attempt >= 1 && attempt <= self.max_attempts).then(|| self.unit.saturating_mul(attempt))
    }

    /// Policy that never reconnects.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }
}
