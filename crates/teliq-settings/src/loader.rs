//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TeliqSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over defaults
//! 3. Apply `TELIQ_*` environment overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{LogFormat, TeliqSettings};

/// Default settings file location (`~/.teliq/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".teliq").join("settings.json")
}

/// Load settings from the default path with env overrides.
pub fn load_settings() -> Result<TeliqSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from `path` with env overrides.
///
/// A missing file yields defaults; an unreadable or malformed file is an
/// error. The result is validated.
pub fn load_settings_from_path(path: &Path) -> Result<TeliqSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<TeliqSettings> {
    let defaults = serde_json::to_value(TeliqSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TELIQ_*` overrides from the process environment.
pub fn apply_env_overrides(settings: &mut TeliqSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Invalid values are ignored with a warning, leaving the file/default value.
pub fn apply_overrides<F>(settings: &mut TeliqSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = Env { lookup };

    // ── Connection ──────────────────────────────────────────────────
    if let Some(v) = env.string("TELIQ_URL") {
        settings.connection.url = v;
    }
    if let Some(v) = env.u64("TELIQ_CALL_TIMEOUT_MS", 1, 600_000) {
        settings.connection.call_timeout_ms = v;
    }
    if let Some(v) = env.u64("TELIQ_CONNECT_TIMEOUT_MS", 1, 600_000) {
        settings.connection.connect_timeout_ms = v;
    }
    if let Some(v) = env.u64("TELIQ_MAX_RECONNECT_ATTEMPTS", 0, 1_000) {
        // bounded above, so the narrowing cannot fail
        settings.connection.max_reconnect_attempts = u32::try_from(v).unwrap_or(u32::MAX);
    }
    if let Some(v) = env.u64("TELIQ_RECONNECT_UNIT_MS", 1, 3_600_000) {
        settings.connection.reconnect_unit_ms = v;
    }
    if let Some(v) = env.usize("TELIQ_EVENT_BUFFER", 1, 1_048_576) {
        settings.connection.event_buffer = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.string("TELIQ_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = env.string("TELIQ_LOG_FORMAT") {
        match parse_log_format(&v) {
            Some(format) => settings.logging.format = format,
            None => warn!(key = "TELIQ_LOG_FORMAT", value = %v, "invalid log format, ignoring"),
        }
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a log format name (case-insensitive).
pub fn parse_log_format(val: &str) -> Option<LogFormat> {
    match val.trim().to_lowercase().as_str() {
        "compact" | "text" => Some(LogFormat::Compact),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

// ── Env readers ─────────────────────────────────────────────────────────────

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        let val = (self.lookup)(name)?;
        let result = parse_u64_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid u64 env var, ignoring");
        }
        result
    }

    fn usize(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        let val = (self.lookup)(name)?;
        let result = parse_usize_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid usize env var, ignoring");
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_objects() {
        let merged = deep_merge(
            json!({"connection": {"url": "a", "callTimeoutMs": 5000}}),
            json!({"connection": {"url": "b"}}),
        );
        assert_eq!(merged, json!({"connection": {"url": "b", "callTimeoutMs": 5000}}));
    }

    #[test]
    fn merge_skips_nulls() {
        let merged = deep_merge(json!({"a": 1}), json!({"a": null, "b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn merge_replaces_arrays_and_primitives() {
        assert_eq!(deep_merge(json!([1, 2]), json!([3])), json!([3]));
        assert_eq!(deep_merge(json!({"a": 1}), json!(7)), json!(7));
    }

    // ── file layer ──────────────────────────────────────────────────

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_file_layer(&dir.path().join("nope.json")).unwrap();
        assert_eq!(s, TeliqSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"connection": {{"url": "ws://bot:6700", "maxReconnectAttempts": 2}}, "logging": {{"format": "json"}}}}"#
        )
        .unwrap();
        let s = load_file_layer(file.path()).unwrap();
        assert_eq!(s.connection.url, "ws://bot:6700");
        assert_eq!(s.connection.max_reconnect_attempts, 2);
        assert_eq!(s.connection.call_timeout_ms, 5000);
        assert_eq!(s.logging.format, LogFormat::Json);
    }

    #[test]
    fn malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(load_file_layer(file.path()).is_err());
    }

    #[test]
    fn invalid_file_value_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"connection": {{"url": "http://nope"}}}}"#).unwrap();
        let s = load_file_layer(file.path()).unwrap();
        assert!(s.validate().is_err());
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn env_overrides_apply() {
        let mut s = TeliqSettings::default();
        apply_overrides(
            &mut s,
            lookup(&[
                ("TELIQ_URL", "ws://10.0.0.2:3001"),
                ("TELIQ_CALL_TIMEOUT_MS", "1500"),
                ("TELIQ_MAX_RECONNECT_ATTEMPTS", "0"),
                ("TELIQ_EVENT_BUFFER", "64"),
                ("TELIQ_LOG_LEVEL", "debug"),
                ("TELIQ_LOG_FORMAT", "JSON"),
            ]),
        );
        assert_eq!(s.connection.url, "ws://10.0.0.2:3001");
        assert_eq!(s.connection.call_timeout_ms, 1500);
        assert_eq!(s.connection.max_reconnect_attempts, 0);
        assert_eq!(s.connection.event_buffer, 64);
        assert_eq!(s.logging.level, "debug");
        assert_eq!(s.logging.format, LogFormat::Json);
    }

    #[test]
    fn invalid_env_values_ignored() {
        let mut s = TeliqSettings::default();
        apply_overrides(
            &mut s,
            lookup(&[
                ("TELIQ_URL", ""),
                ("TELIQ_CALL_TIMEOUT_MS", "0"),
                ("TELIQ_RECONNECT_UNIT_MS", "soon"),
                ("TELIQ_LOG_FORMAT", "xml"),
            ]),
        );
        assert_eq!(s, TeliqSettings::default());
    }

    // ── parsers ─────────────────────────────────────────────────────

    #[test]
    fn parse_ranges() {
        assert_eq!(parse_u64_range("42", 1, 100), Some(42));
        assert_eq!(parse_u64_range(" 42 ", 1, 100), Some(42));
        assert_eq!(parse_u64_range("0", 1, 100), None);
        assert_eq!(parse_u64_range("-1", 0, 100), None);
        assert_eq!(parse_usize_range("256", 1, 1024), Some(256));
        assert_eq!(parse_usize_range("2048", 1, 1024), None);
    }

    #[test]
    fn parse_formats() {
        assert_eq!(parse_log_format("compact"), Some(LogFormat::Compact));
        assert_eq!(parse_log_format("Json"), Some(LogFormat::Json));
        assert_eq!(parse_log_format("yaml"), None);
    }
}
