//! Server-reported RPC error object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// An error object carried inside an error response.
///
/// Immutable once parsed; the `code` is kept as raw JSON because servers
/// are not consistent about its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    /// Error code as reported by the server.
    pub code: Value,
    /// Human-readable error message.
    pub message: String,
    /// Optional diagnostic data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error with a numeric code and no data.
    pub fn new(code: i64, message: &str) -> Self {
        Self {
            code: Value::from(code),
            message: message.to_string(),
            data: None,
        }
    }
}

// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_display() {
        let error = RpcError::new(error_codes::METHOD_NOT_FOUND, "Unknown method");
        assert_eq!(error.to_string(), "RPC error -32601: Unknown method");
    }

    #[test]
    fn test_rpc_error_deserializes_with_data() {
        let json = r#"{"code":1,"message":"bad","data":{"gid":"2089b05ecca3d829"}}"#;
        let error: RpcError = serde_json::from_str(json).unwrap();

        assert_eq!(error.code, serde_json::json!(1));
        assert_eq!(error.message, "bad");
        assert!(error.data.is_some());
    }

    #[test]
    fn test_rpc_error_data_omitted_when_none() {
        let error = RpcError::new(error_codes::INTERNAL_ERROR, "boom");
        let json = serde_json::to_string(&error).unwrap();

        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_rpc_error_non_numeric_code() {
        // Some servers report string codes; the raw value is preserved.
        let json = r#"{"code":"EPERM","message":"denied"}"#;
        let error: RpcError = serde_json::from_str(json).unwrap();

        assert_eq!(error.code, serde_json::json!("EPERM"));
    }
}
