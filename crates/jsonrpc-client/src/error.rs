//! Client error types.

use jsonrpc_types::RpcError;
use thiserror::Error;

/// Client error type.
///
/// Transport failures never reject a specific pending call; a server-reported
/// [`RpcError`] rejects exactly the call registered under its identifier.
#[derive(Error, Debug)]
pub enum ClientError {
    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server-reported error for one identifier
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Malformed usage detected locally, before any network interaction
    #[error("invalid method name: {0:?}")]
    InvalidMethod(String),

    /// No persistent connection is open
    #[error("not connected")]
    NotConnected,

    /// Failed to hand a frame to the connection
    #[error("failed to send message: {0}")]
    Send(String),

    /// The client was dropped before a response arrived
    #[error("client dropped before a response arrived")]
    ChannelClosed,
}

/// Result type alias using ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
