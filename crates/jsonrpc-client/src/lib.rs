//! JSON-RPC client core.
//!
//! This crate provides:
//! - Request/response correlation by identifier (completion registry)
//! - WebSocket and HTTP request/response transports, selected per send
//! - Classification of inbound traffic into responses, notifications and
//!   server-to-client requests
//! - Batch and multicall framing
//! - Typed event broadcast for connection lifecycle and raw traffic
//!
//! Protocol-specific policy (method namespacing, credential injection,
//! notification name translation) is supplied through [`Hooks`] rather
//! than built in.

mod client;
mod config;
mod error;
mod events;
mod hooks;
mod registry;

pub use client::{Call, ConnectionState, RequestHandlerFn, RpcClient, MULTICALL_METHOD};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use events::ClientEvent;
pub use hooks::Hooks;
pub use registry::{CompletionRegistry, PendingReply};
