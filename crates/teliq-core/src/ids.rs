//! Correlation ID newtype.
//!
//! Every outbound request carries an `echo` that the remote side copies into
//! its response. IDs are random UUID v4 values, so two concurrently pending
//! calls sharing an ID is a negligible-probability event.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation ID carried in the `echo` field of requests and responses.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EchoId(String);

impl EchoId {
    /// Create a new random ID (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for EchoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for EchoId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EchoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for EchoId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EchoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EchoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EchoId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<EchoId> for String {
    fn from(id: EchoId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_ids_are_unique() {
        let ids: HashSet<EchoId> = (0..10_000).map(|_| EchoId::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn new_id_is_uuid() {
        let id = EchoId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn serde_is_transparent() {
        let id = EchoId::from("echo-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"echo-1\"");
        let back: EchoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn borrow_as_str_for_lookup() {
        let mut set = HashSet::new();
        let _ = set.insert(EchoId::from("abc"));
        assert!(set.contains("abc"));
    }

    #[test]
    fn display_matches_inner() {
        let id = EchoId::from("xyz");
        assert_eq!(id.to_string(), "xyz");
        assert_eq!(String::from(id), "xyz");
    }
}
