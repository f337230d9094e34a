//! aria2 JSON-RPC client.
//!
//! A thin policy layer over the generic [`jsonrpc_client`] core:
//! - outbound method names are prefixed into the `aria2.` namespace
//!   unless they already carry it or belong to the reserved `system.`
//!   namespace
//! - the shared secret, when configured, is injected as `token:<secret>`
//!   ahead of every call's parameters, including multicall sub-calls
//! - inbound notifications are emitted under both their namespaced and
//!   bare names
//!
//! ```no_run
//! use aria2::{Aria2Client, Aria2Config};
//! use serde_json::json;
//!
//! # async fn example() -> aria2::ClientResult<()> {
//! let client = Aria2Client::new(Aria2Config {
//!     secret: "abc".to_string(),
//!     ..Default::default()
//! });
//! client.open().await?;
//! let gid = client.call("addUri", vec![json!(["http://example.com/file"])]).await?.await?;
//! # let _ = gid;
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod naming;

pub use client::{Aria2Client, Aria2Config};
pub use naming::{prefix, unprefix, DEFAULT_NAMESPACE, SYSTEM_NAMESPACE};

pub use jsonrpc_client::{
    Call, ClientError, ClientEvent, ClientResult, ConnectionState, PendingReply, RpcClient,
};
pub use jsonrpc_types::RpcError;
