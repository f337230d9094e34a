//! Events emitted by the client.

use serde_json::Value;

/// Events emitted by the client.
///
/// Subscribers receive enumerated variants with typed payloads; there is
/// no string-keyed event bus.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The persistent connection reached the open state.
    Open,
    /// The persistent connection reached the closed state.
    Closed,
    /// A non-fatal transport-level failure (refused connection, dropped
    /// socket, unparseable frame). Never tied to a specific pending call.
    Error(String),
    /// Raw outbound frame, emitted before transmission.
    Outbound(Value),
    /// Raw inbound payload, emitted before classification.
    Inbound(Value),
    /// A server notification, one event per translated name.
    Notification {
        /// Notification name, as translated by the configured hook.
        method: String,
        /// Notification payload.
        params: Vec<Value>,
    },
}
