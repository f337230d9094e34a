//! Client configuration.

/// Client configuration.
///
/// Immutable after construction; all defaults are resolved before the
/// client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Use TLS (`wss`/`https`) instead of plain transports.
    pub secure: bool,
    /// Endpoint path, including the leading slash.
    pub path: String,
    /// Shared secret sent as a credential parameter; empty disables it.
    pub secret: String,
    /// Default method namespace used by policy hooks; empty disables it.
    pub namespace: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 80,
            secure: false,
            path: "/jsonrpc".to_string(),
            secret: String::new(),
            namespace: String::new(),
        }
    }
}

impl ClientConfig {
    /// URL for the persistent WebSocket connection.
    pub fn ws_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.path)
    }

    /// URL for the one-shot HTTP exchange.
    pub fn http_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.path)
    }
}
