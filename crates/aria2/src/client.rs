//! aria2 client built by composing the generic core with policy hooks.

use crate::naming::{prefix, unprefix, DEFAULT_NAMESPACE};
use jsonrpc_client::{
    Call, ClientConfig, ClientEvent, ClientResult, ConnectionState, Hooks, PendingReply, RpcClient,
};
use jsonrpc_types::Request;
use serde_json::Value;
use tokio::sync::broadcast;

/// aria2 client configuration.
///
/// Immutable after construction. Mirrors [`ClientConfig`] with the aria2
/// daemon's defaults.
#[derive(Debug, Clone)]
pub struct Aria2Config {
    /// Daemon host name or address.
    pub host: String,
    /// Daemon RPC port.
    pub port: u16,
    /// Use TLS transports.
    pub secure: bool,
    /// RPC endpoint path.
    pub path: String,
    /// RPC secret configured on the daemon; empty disables the token.
    pub secret: String,
    /// Method namespace.
    pub namespace: String,
}

impl Default for Aria2Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6800,
            secure: false,
            path: "/jsonrpc".to_string(),
            secret: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl From<Aria2Config> for ClientConfig {
    fn from(config: Aria2Config) -> Self {
        Self {
            host: config.host,
            port: config.port,
            secure: config.secure,
            path: config.path,
            secret: config.secret,
            namespace: config.namespace,
        }
    }
}

/// Prepend the `token:<secret>` credential; empty secret passes params
/// through untouched.
fn token_params(secret: &str, params: Vec<Value>) -> Vec<Value> {
    if secret.is_empty() {
        return params;
    }
    let mut decorated = Vec::with_capacity(params.len() + 1);
    decorated.push(Value::String(format!("token:{secret}")));
    decorated.extend(params);
    decorated
}

/// Client for the aria2 download daemon.
pub struct Aria2Client {
    rpc: RpcClient,
    namespace: String,
}

impl Aria2Client {
    /// Create a client from the given configuration.
    pub fn new(config: Aria2Config) -> Self {
        let namespace = config.namespace.clone();
        let secret = config.secret.clone();

        let hooks = Hooks::new()
            .rewrite_method({
                let namespace = namespace.clone();
                move |name| prefix(&namespace, name)
            })
            .decorate_params(move |params| token_params(&secret, params))
            .notification_names({
                let namespace = namespace.clone();
                move |name| {
                    let bare = unprefix(&namespace, name);
                    if bare == name {
                        vec![name.to_string()]
                    } else {
                        vec![name.to_string(), bare.to_string()]
                    }
                }
            });

        Self {
            rpc: RpcClient::with_hooks(config.into(), hooks),
            namespace,
        }
    }

    /// Create a client with the aria2 defaults.
    pub fn with_defaults() -> Self {
        Self::new(Aria2Config::default())
    }

    /// The underlying generic client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Subscribe to client events.
    ///
    /// Notifications arrive twice, once under the namespaced name and once
    /// under the bare name, with identical payloads.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.rpc.subscribe()
    }

    /// Open the persistent WebSocket connection to the daemon.
    pub async fn open(&self) -> ClientResult<()> {
        self.rpc.open().await
    }

    /// Close the persistent connection.
    pub async fn close(&self) -> ClientResult<()> {
        self.rpc.close().await
    }

    /// Get the current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.rpc.state().await
    }

    /// Check if the persistent connection is open.
    pub async fn is_connected(&self) -> bool {
        self.rpc.is_connected().await
    }

    /// Register the handler for requests arriving from the daemon.
    pub async fn on_request(&self, handler: impl Fn(Request) + Send + Sync + 'static) {
        self.rpc.on_request(handler).await
    }

    /// Invoke one method; the namespace and secret are applied here.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> ClientResult<PendingReply> {
        self.rpc.call(method, params).await
    }

    /// Send N calls as one array frame, each resolving independently.
    pub async fn batch(&self, calls: Vec<Call>) -> ClientResult<Vec<PendingReply>> {
        self.rpc.batch(calls).await
    }

    /// Execute a list of calls as one `system.multicall` unit.
    pub async fn multicall(&self, calls: Vec<Call>) -> ClientResult<PendingReply> {
        self.rpc.multicall(calls).await
    }

    /// Send a fire-and-forget notification.
    pub async fn notify(&self, method: &str, params: Vec<Value>) -> ClientResult<()> {
        self.rpc.notify(method, params).await
    }

    /// List the daemon's RPC methods, as bare names.
    pub async fn list_methods(&self) -> ClientResult<Vec<String>> {
        self.list_bare("system.listMethods").await
    }

    /// List the daemon's notification names, as bare names.
    pub async fn list_notifications(&self) -> ClientResult<Vec<String>> {
        self.list_bare("system.listNotifications").await
    }

    async fn list_bare(&self, method: &str) -> ClientResult<Vec<String>> {
        let reply = self.rpc.call(method, Vec::new()).await?;
        let value = reply.await?;
        let names: Vec<String> = serde_json::from_value(value)?;
        Ok(names
            .iter()
            .map(|name| unprefix(&self.namespace, name).to_string())
            .collect())
    }
}
