//! JSON-RPC wire envelope types.
//!
//! One object per message, or a bare JSON array of request objects for a
//! batch. The version key is spelled `json-rpc` on the wire for
//! compatibility with the aria2 JavaScript client; inbound messages are
//! accepted with or without it.

mod envelope;
mod error;

pub use envelope::{Frame, Notification, Request, Response, PROTOCOL_VERSION};
pub use error::{error_codes, RpcError};
