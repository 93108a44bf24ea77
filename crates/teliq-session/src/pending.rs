//! Pending call table.
//!
//! Maps each outstanding `echo` to the one-shot sender its caller is waiting
//! on. Every resolution path (response, timeout, drain) goes through an
//! atomic remove, so an entry is resolved at most once.

use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use teliq_core::{CallError, CallResult, EchoId};
use tokio::sync::oneshot;
use tracing::trace;

/// Receiving half handed to the caller on registration.
pub type CallReceiver = oneshot::Receiver<CallResult<Value>>;

struct PendingCall {
    action: String,
    created_at: Instant,
    tx: oneshot::Sender<CallResult<Value>>,
}

/// Concurrency-safe map from correlation ID to waiting caller.
#[derive(Default)]
pub struct PendingTable {
    calls: DashMap<EchoId, PendingCall>,
}

impl PendingTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call. Fails if `echo` is already pending.
    pub fn register(&self, echo: EchoId, action: &str) -> CallResult<CallReceiver> {
        match self.calls.entry(echo) {
            Entry::Occupied(entry) => Err(CallError::CorrelationCollision {
                echo: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                let (tx, rx) = oneshot::channel();
                let _ = entry.insert(PendingCall {
                    action: action.to_owned(),
                    created_at: Instant::now(),
                    tx,
                });
                Ok(rx)
            }
        }
    }

    /// Remove and resolve the call for `echo`.
    ///
    /// Returns false when no such call is pending (it already completed).
    pub fn resolve(&self, echo: &str, result: CallResult<Value>) -> bool {
        let Some((_, call)) = self.calls.remove(echo) else {
            return false;
        };
        trace!(
            action = %call.action,
            echo,
            elapsed_ms = call.created_at.elapsed().as_millis(),
            ok = result.is_ok(),
            "call resolved"
        );
        // the caller may have stopped waiting
        let _ = call.tx.send(result);
        true
    }

    /// Remove the call for `echo` without resolving it.
    pub fn discard(&self, echo: &str) -> bool {
        self.calls.remove(echo).is_some()
    }

    /// Resolve every pending call with `error()`. Returns how many were resolved.
    pub fn drain<F>(&self, error: F) -> usize
    where
        F: Fn() -> CallError,
    {
        let echoes: Vec<EchoId> = self.calls.iter().map(|e| e.key().clone()).collect();
        echoes
            .iter()
            .filter(|echo| self.resolve(echo, Err(error())))
            .count()
    }

    /// Whether `echo` is pending.
    pub fn contains(&self, echo: &str) -> bool {
        self.calls.contains_key(echo)
    }

    /// Number of pending calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether no calls are pending.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn register_then_resolve() {
        let table = PendingTable::new();
        let echo = EchoId::from("e1");
        let rx = table.register(echo.clone(), "get_status").unwrap();
        assert!(table.contains("e1"));

        assert!(table.resolve("e1", Ok(json!({"online": true}))));
        assert!(table.is_empty());
        assert_eq!(rx.await.unwrap().unwrap(), json!({"online": true}));
    }

    #[test]
    fn duplicate_echo_collides() {
        let table = PendingTable::new();
        let _rx = table.register(EchoId::from("dup"), "a").unwrap();
        let err = table.register(EchoId::from("dup"), "b").unwrap_err();
        assert_eq!(err, CallError::CorrelationCollision { echo: "dup".into() });
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn resolves_at_most_once() {
        let table = PendingTable::new();
        let rx = table.register(EchoId::from("once"), "a").unwrap();
        assert!(table.resolve("once", Ok(json!(1))));
        assert!(!table.resolve(
            "once",
            Err(CallError::Timeout {
                action: "a".into(),
                timeout_ms: 1
            })
        ));
        assert_eq!(rx.await.unwrap().unwrap(), json!(1));
    }

    #[test]
    fn resolve_unknown_is_false() {
        let table = PendingTable::new();
        assert!(!table.resolve("ghost", Ok(Value::Null)));
        assert!(!table.discard("ghost"));
    }

    #[tokio::test]
    async fn drain_resolves_everything() {
        let table = PendingTable::new();
        let receivers: Vec<_> = (0..5)
            .map(|i| table.register(EchoId::from(format!("e{i}")), "a").unwrap())
            .collect();

        assert_eq!(table.drain(|| CallError::ConnectionLost), 5);
        assert!(table.is_empty());
        for rx in receivers {
            assert_matches!(rx.await.unwrap(), Err(CallError::ConnectionLost));
        }
    }

    #[tokio::test]
    async fn discard_drops_sender() {
        let table = PendingTable::new();
        let rx = table.register(EchoId::from("gone"), "a").unwrap();
        assert!(table.discard("gone"));
        assert!(rx.await.is_err());
    }

    #[test]
    fn resolve_after_receiver_dropped_still_removes() {
        let table = PendingTable::new();
        drop(table.register(EchoId::from("late"), "a").unwrap());
        assert!(table.resolve("late", Ok(Value::Null)));
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn concurrent_resolution_is_single() {
        let table = Arc::new(PendingTable::new());
        let rx = table.register(EchoId::from("race"), "a").unwrap();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let table = Arc::clone(&table);
            tasks.push(tokio::spawn(async move { table.resolve("race", Ok(json!(i))) }));
        }
        let mut wins = 0;
        for t in tasks {
            if t.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert!(rx.await.unwrap().is_ok());
    }
}
