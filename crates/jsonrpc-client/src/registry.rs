//! Completion registry.
//!
//! Maps request identifiers to pending completion handles. Each entry is
//! resolved or rejected at most once; deliveries for unknown or already
//! completed identifiers are dropped silently, guarding against duplicate
//! or stale responses.

use crate::{ClientError, ClientResult};
use jsonrpc_types::RpcError;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::debug;

type ReplySender = oneshot::Sender<Result<Value, RpcError>>;

/// Allocates identifiers and tracks pending calls.
///
/// Identifiers start at zero, increase strictly, and are never reused.
/// Entries are removed only by resolution; a call whose response never
/// arrives stays pending until the registry is dropped. No timeout or
/// cleanup runs here — resilience policy belongs to callers.
#[derive(Default)]
pub struct CompletionRegistry {
    next_id: u64,
    pending: HashMap<u64, ReplySender>,
}

impl CompletionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier and a pending completion handle.
    pub fn register(&mut self) -> (u64, PendingReply) {
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        (id, PendingReply { rx })
    }

    /// Complete the matching entry with a result.
    ///
    /// Silent no-op when the identifier is unknown.
    pub fn resolve(&mut self, id: u64, result: Value) {
        match self.pending.remove(&id) {
            Some(tx) => {
                let _ = tx.send(Ok(result));
            }
            None => debug!(id, "response for unknown identifier; dropped"),
        }
    }

    /// Complete the matching entry with a server-reported error.
    ///
    /// Silent no-op when the identifier is unknown.
    pub fn reject(&mut self, id: u64, error: RpcError) {
        match self.pending.remove(&id) {
            Some(tx) => {
                let _ = tx.send(Err(error));
            }
            None => debug!(id, "error for unknown identifier; dropped"),
        }
    }

    /// Drop an entry without completing it (used when a send fails before
    /// the request ever reached the wire).
    pub fn forget(&mut self, id: u64) {
        self.pending.remove(&id);
    }

    /// Number of calls still awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// A pending call's completion handle.
///
/// Resolves with the server result, or fails with
/// [`ClientError::Rpc`] when the server reported an error for this
/// identifier. Stays pending forever if no response ever arrives.
#[derive(Debug)]
pub struct PendingReply {
    rx: oneshot::Receiver<Result<Value, RpcError>>,
}

impl Future for PendingReply {
    type Output = ClientResult<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|outcome| match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(ClientError::Rpc(error)),
            Err(_) => Err(ClientError::ChannelClosed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifiers_are_strictly_increasing() {
        let mut registry = CompletionRegistry::new();
        let ids: Vec<u64> = (0..5).map(|_| registry.register().0).collect();

        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_resolve_completes_matching_entry() {
        let mut registry = CompletionRegistry::new();
        let (id, reply) = registry.register();

        registry.resolve(id, json!("ok"));

        assert_eq!(reply.await.unwrap(), json!("ok"));
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_reject_surfaces_rpc_error() {
        let mut registry = CompletionRegistry::new();
        let (id, reply) = registry.register();

        registry.reject(id, RpcError::new(1, "bad"));

        match reply.await {
            Err(ClientError::Rpc(error)) => assert_eq!(error.message, "bad"),
            other => panic!("expected RPC error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_out_of_order_delivery() {
        let mut registry = CompletionRegistry::new();
        let handles: Vec<_> = (0..3).map(|_| registry.register()).collect();

        // Deliver responses in reverse submission order.
        for (id, _) in handles.iter().rev() {
            registry.resolve(*id, json!(*id));
        }

        for (id, reply) in handles {
            assert_eq!(reply.await.unwrap(), json!(id));
        }
    }

    #[test]
    fn test_unknown_identifier_is_silent() {
        let mut registry = CompletionRegistry::new();
        registry.resolve(99, json!(null));
        registry.reject(42, RpcError::new(0, "stale"));
    }

    #[tokio::test]
    async fn test_double_delivery_is_silent() {
        let mut registry = CompletionRegistry::new();
        let (id, reply) = registry.register();

        registry.resolve(id, json!("first"));
        registry.resolve(id, json!("second"));
        registry.reject(id, RpcError::new(0, "late"));

        assert_eq!(reply.await.unwrap(), json!("first"));
    }

    #[tokio::test]
    async fn test_rejection_leaves_other_entries_pending() {
        let mut registry = CompletionRegistry::new();
        let (_, other) = registry.register();
        let (id, reply) = registry.register();

        registry.reject(id, RpcError::new(1, "bad"));

        assert!(matches!(reply.await, Err(ClientError::Rpc(_))));
        assert_eq!(registry.pending_count(), 1);
        drop(other);
    }

    #[tokio::test]
    async fn test_dropped_registry_fails_pending_replies() {
        let mut registry = CompletionRegistry::new();
        let (_, reply) = registry.register();
        drop(registry);

        assert!(matches!(reply.await, Err(ClientError::ChannelClosed)));
    }

    #[test]
    fn test_forget_discards_without_completing() {
        let mut registry = CompletionRegistry::new();
        let (id, reply) = registry.register();

        registry.forget(id);

        assert_eq!(registry.pending_count(), 0);
        drop(reply);
    }
}
