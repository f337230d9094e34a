//! Request, notification and response envelopes.

use crate::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version string carried in outbound messages.
pub const PROTOCOL_VERSION: &str = "2.0";

fn protocol_version() -> String {
    PROTOCOL_VERSION.to_string()
}

/// A request expecting a response correlated by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Method to invoke.
    pub method: String,
    /// Protocol version. Non-standard key, kept verbatim for wire
    /// compatibility with the original client.
    #[serde(rename = "json-rpc", default = "protocol_version")]
    pub version: String,
    /// Identifier echoed back by the response.
    pub id: u64,
    /// Positional parameters (omitted from the wire when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl Request {
    /// Create a new request.
    pub fn new(method: &str, id: u64, params: Option<Vec<Value>>) -> Self {
        Self {
            method: method.to_string(),
            version: protocol_version(),
            id,
            params,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A fire-and-forget message; never carries an `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Method (event) name.
    pub method: String,
    /// Protocol version, as on [`Request`].
    #[serde(rename = "json-rpc", default = "protocol_version")]
    pub version: String,
    /// Positional parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
}

impl Notification {
    /// Create a new notification.
    pub fn new(method: &str, params: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            version: protocol_version(),
            params,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A response to a request, matched by `id` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Identifier of the request this answers. Servers send a null id for
    /// requests they could not parse; those responses match nothing.
    #[serde(default)]
    pub id: Option<u64>,
    /// Result data (if successful).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    /// Create a successful response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: RpcError) -> Self {
        Self {
            id: Some(id),
            result: None,
            error: Some(error),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One outbound wire frame.
///
/// A batch is an ordered sequence of requests serialized as a bare JSON
/// array; each member still carries its own `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Frame {
    /// A batch of requests sent as one array frame.
    Batch(Vec<Request>),
    /// A single request.
    Request(Request),
    /// A single notification.
    Notification(Notification),
}

impl Frame {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
