//! # teliq-settings
//!
//! Layered configuration for TeliQ clients.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TeliqSettings::default()`]
//! 2. **User file**: `~/.teliq/settings.json` or an explicit path (deep-merged)
//! 3. **Environment variables**: `TELIQ_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_under_home_dir() {
        let path = settings_path();
        assert!(path.ends_with(".teliq/settings.json"));
    }

    #[test]
    fn load_from_missing_path_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings.connection.max_reconnect_attempts, 5);
        assert_eq!(settings.connection.event_buffer, 256);
    }
}
