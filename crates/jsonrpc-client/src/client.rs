//! JSON-RPC client with interchangeable transports.
//!
//! Frames go over the persistent WebSocket connection when it is open,
//! and fall back to a one-shot HTTP POST exchange otherwise. Both
//! transports feed inbound payloads through the same classification
//! path, so callers see identical semantics either way.

use crate::registry::CompletionRegistry;
use crate::{ClientConfig, ClientError, ClientEvent, ClientResult, Hooks, PendingReply};
use futures_util::{SinkExt, StreamExt};
use jsonrpc_types::{Frame, Notification, Request, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Composite method that executes a list of calls as one unit.
pub const MULTICALL_METHOD: &str = "system.multicall";

/// Handler for requests arriving from the remote side.
pub type RequestHandlerFn = Box<dyn Fn(Request) + Send + Sync>;

/// Connection state of the persistent transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One logical call: a method name and its positional parameters.
#[derive(Debug, Clone)]
pub struct Call {
    /// Method name, before any rewrite hook runs.
    pub method: String,
    /// Positional parameters, before any decoration hook runs.
    pub params: Vec<Value>,
}

impl Call {
    /// Create a new call descriptor.
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

impl From<(&str, Vec<Value>)> for Call {
    fn from((method, params): (&str, Vec<Value>)) -> Self {
        Self::new(method, params)
    }
}

/// JSON-RPC client.
///
/// Cheap to clone; clones share the identifier counter, the pending-call
/// registry and the connection.
#[derive(Clone)]
pub struct RpcClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    hooks: Hooks,
    http: reqwest::Client,
    registry: Mutex<CompletionRegistry>,
    state: RwLock<ConnectionState>,
    ws_sender: Mutex<Option<mpsc::Sender<Message>>>,
    events: broadcast::Sender<ClientEvent>,
    on_request: RwLock<Option<RequestHandlerFn>>,
}

impl RpcClient {
    /// Create a client with identity hooks.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_hooks(config, Hooks::new())
    }

    /// Create a client with the given policy hooks.
    pub fn with_hooks(config: ClientConfig, hooks: Hooks) -> Self {
        let (events, _) = broadcast::channel(100);

        Self {
            inner: Arc::new(Inner {
                config,
                hooks,
                http: reqwest::Client::new(),
                registry: Mutex::new(CompletionRegistry::new()),
                state: RwLock::new(ConnectionState::Disconnected),
                ws_sender: Mutex::new(None),
                events,
                on_request: RwLock::new(None),
            }),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Subscribe to client events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.events.subscribe()
    }

    /// Get the current connection state.
    pub async fn state(&self) -> ConnectionState {
        *self.inner.state.read().await
    }

    /// Check if the persistent connection is fully open.
    pub async fn is_connected(&self) -> bool {
        *self.inner.state.read().await == ConnectionState::Connected
    }

    /// Register the handler for requests arriving from the remote side.
    ///
    /// Without one, inbound requests are logged and dropped.
    pub async fn on_request(&self, handler: impl Fn(Request) + Send + Sync + 'static) {
        *self.inner.on_request.write().await = Some(Box::new(handler));
    }

    /// Invoke one method and return the pending reply.
    ///
    /// The send has completed when this returns; the reply resolves when
    /// the matching response arrives, on either transport.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> ClientResult<PendingReply> {
        let (request, reply) = self.build_call(method, params, true).await?;
        let id = request.id;

        if let Err(e) = self.send(Frame::Request(request)).await {
            self.inner.registry.lock().await.forget(id);
            return Err(e);
        }
        Ok(reply)
    }

    /// Send N independent calls as one array frame.
    ///
    /// Each call keeps its own identifier and resolves independently; the
    /// returned replies are in submission order even though responses may
    /// arrive in any order.
    pub async fn batch(&self, calls: Vec<Call>) -> ClientResult<Vec<PendingReply>> {
        let mut requests = Vec::with_capacity(calls.len());
        let mut replies = Vec::with_capacity(calls.len());

        for call in calls {
            let (request, reply) = self.build_call(&call.method, call.params, true).await?;
            requests.push(request);
            replies.push(reply);
        }

        let ids: Vec<u64> = requests.iter().map(|r| r.id).collect();
        if let Err(e) = self.send(Frame::Batch(requests)).await {
            let mut registry = self.inner.registry.lock().await;
            for id in ids {
                registry.forget(id);
            }
            return Err(e);
        }
        Ok(replies)
    }

    /// Execute a list of calls atomically as one composite request.
    ///
    /// One identifier, one pending entry, one wire frame; the reply
    /// resolves with the full array of sub-results as a single unit. Each
    /// sub-call runs through the rewrite and decoration hooks; the
    /// composite request itself does not.
    pub async fn multicall(&self, calls: Vec<Call>) -> ClientResult<PendingReply> {
        let entries: Vec<Value> = calls
            .into_iter()
            .map(|call| {
                json!({
                    "methodName": self.apply_rewrite(&call.method),
                    "params": self.apply_decorate(call.params),
                })
            })
            .collect();

        let (request, reply) = self
            .build_call(MULTICALL_METHOD, vec![Value::Array(entries)], false)
            .await?;
        let id = request.id;

        if let Err(e) = self.send(Frame::Request(request)).await {
            self.inner.registry.lock().await.forget(id);
            return Err(e);
        }
        Ok(reply)
    }

    /// Send a fire-and-forget notification; no identifier, no reply.
    pub async fn notify(&self, method: &str, params: Vec<Value>) -> ClientResult<()> {
        if method.is_empty() {
            return Err(ClientError::InvalidMethod(method.to_string()));
        }
        let method = self.apply_rewrite(method);
        let params = self.apply_decorate(params);
        self.send(Frame::Notification(Notification::new(&method, params)))
            .await
    }

    /// Build one request and register its pending entry.
    ///
    /// Fails synchronously on an empty method name — a programming error,
    /// not a transport fault.
    async fn build_call(
        &self,
        method: &str,
        params: Vec<Value>,
        hooked: bool,
    ) -> ClientResult<(Request, PendingReply)> {
        if method.is_empty() {
            return Err(ClientError::InvalidMethod(method.to_string()));
        }

        let (method, params) = if hooked {
            (self.apply_rewrite(method), self.apply_decorate(params))
        } else {
            (method.to_string(), params)
        };

        let mut registry = self.inner.registry.lock().await;
        let (id, reply) = registry.register();
        let params = if params.is_empty() { None } else { Some(params) };
        Ok((Request::new(&method, id, params), reply))
    }

    fn apply_rewrite(&self, method: &str) -> String {
        match &self.inner.hooks.rewrite_method {
            Some(rewrite) => rewrite(method),
            None => method.to_string(),
        }
    }

    fn apply_decorate(&self, params: Vec<Value>) -> Vec<Value> {
        match &self.inner.hooks.decorate_params {
            Some(decorate) => decorate(params),
            None => params,
        }
    }

    /// Send a frame, choosing the transport per send: the WebSocket when
    /// it is fully open, the HTTP exchange otherwise.
    async fn send(&self, frame: Frame) -> ClientResult<()> {
        let payload = serde_json::to_value(&frame)?;
        let _ = self.inner.events.send(ClientEvent::Outbound(payload.clone()));

        let sender = self.inner.ws_sender.lock().await.clone();
        let connected = self.is_connected().await;
        match sender {
            Some(tx) if connected => {
                let text = serde_json::to_string(&payload)?;
                tx.send(Message::Text(text.into()))
                    .await
                    .map_err(|e| ClientError::Send(e.to_string()))
            }
            _ => self.send_http(payload).await,
        }
    }

    /// One-shot HTTP exchange: POST the frame, then feed the response
    /// body through the same inbound path the WebSocket uses.
    async fn send_http(&self, payload: Value) -> ClientResult<()> {
        let url = self.inner.config.http_url();
        let response = self
            .inner
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        match response.json::<Value>().await {
            Ok(body) => self.process_incoming(body).await,
            Err(e) => {
                warn!(error = %e, "failed to parse HTTP response body");
                let _ = self.inner.events.send(ClientEvent::Error(e.to_string()));
            }
        }
        Ok(())
    }

    /// Open the persistent connection.
    ///
    /// Completes once the connection reaches the open state and emits
    /// [`ClientEvent::Open`]. A connect failure emits
    /// [`ClientEvent::Error`] and is also returned. No-op when already
    /// connecting or connected.
    pub async fn open(&self) -> ClientResult<()> {
        {
            let state = self.inner.state.read().await;
            if *state != ConnectionState::Disconnected {
                debug!("already connecting or connected");
                return Ok(());
            }
        }
        *self.inner.state.write().await = ConnectionState::Connecting;

        let url = self.inner.config.ws_url();
        info!(url = %url, "connecting");

        let (ws_stream, _) = match connect_async(&url).await {
            Ok(connected) => connected,
            Err(e) => {
                *self.inner.state.write().await = ConnectionState::Disconnected;
                error!(error = %e, "connection failed");
                let _ = self.inner.events.send(ClientEvent::Error(e.to_string()));
                return Err(e.into());
            }
        };

        let (mut write, mut read) = ws_stream.split();
        let (msg_tx, mut msg_rx) = mpsc::channel::<Message>(100);
        *self.inner.ws_sender.lock().await = Some(msg_tx);
        *self.inner.state.write().await = ConnectionState::Connected;
        let _ = self.inner.events.send(ClientEvent::Open);

        // Writer task: drains the channel into the socket.
        tokio::spawn(async move {
            while let Some(msg) = msg_rx.recv().await {
                if write.send(msg).await.is_err() {
                    break;
                }
            }
        });

        // Reader task: parses inbound frames and classifies them.
        let client = self.clone();
        tokio::spawn(async move {
            while let Some(item) = read.next().await {
                match item {
                    Ok(Message::Text(text)) => match serde_json::from_str::<Value>(&text) {
                        Ok(payload) => client.process_incoming(payload).await,
                        Err(e) => {
                            // Unparseable frames are dropped, never classified.
                            warn!(error = %e, "discarding unparseable frame");
                            let _ = client.inner.events.send(ClientEvent::Error(e.to_string()));
                        }
                    },
                    Ok(Message::Ping(data)) => {
                        if let Some(tx) = client.inner.ws_sender.lock().await.as_ref() {
                            let _ = tx.send(Message::Pong(data)).await;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("connection closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "WebSocket error");
                        let _ = client.inner.events.send(ClientEvent::Error(e.to_string()));
                        break;
                    }
                }
            }

            *client.inner.ws_sender.lock().await = None;
            *client.inner.state.write().await = ConnectionState::Disconnected;
            let _ = client.inner.events.send(ClientEvent::Closed);
        });

        Ok(())
    }

    /// Close the persistent connection.
    ///
    /// Sends the close frame and waits for the connection to reach the
    /// closed state. Pending calls are left untouched.
    pub async fn close(&self) -> ClientResult<()> {
        let mut events = self.subscribe();

        let sender = self.inner.ws_sender.lock().await.clone();
        let tx = sender.ok_or(ClientError::NotConnected)?;
        tx.send(Message::Close(None))
            .await
            .map_err(|e| ClientError::Send(e.to_string()))?;

        loop {
            match events.recv().await {
                Ok(ClientEvent::Closed) => return Ok(()),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return Err(ClientError::ChannelClosed),
            }
        }
    }

    /// Feed a raw inbound payload through classification.
    ///
    /// Both transports call this; it is public so alternate transports
    /// and tests can inject traffic. Arrays (batch replies) are expanded
    /// and each element classified independently.
    pub async fn process_incoming(&self, payload: Value) {
        let _ = self.inner.events.send(ClientEvent::Inbound(payload.clone()));

        match payload {
            Value::Array(items) => {
                for item in items {
                    self.classify(item).await;
                }
            }
            other => self.classify(other).await,
        }
    }

    /// Classification rules: no `method` — a response; `method` without
    /// `id` — a notification; both — a request from the remote side.
    async fn classify(&self, object: Value) {
        let has_method = object.get("method").is_some();
        let has_id = object.get("id").is_some_and(|id| !id.is_null());

        if !has_method {
            self.handle_response(object).await;
        } else if !has_id {
            self.handle_notification(object);
        } else {
            self.handle_request(object).await;
        }
    }

    async fn handle_response(&self, object: Value) {
        let response: Response = match serde_json::from_value(object) {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "discarding malformed response");
                return;
            }
        };
        let Some(id) = response.id else {
            debug!("response without identifier; dropped");
            return;
        };

        let mut registry = self.inner.registry.lock().await;
        match response.error {
            Some(rpc_error) => registry.reject(id, rpc_error),
            None => registry.resolve(id, response.result.unwrap_or(Value::Null)),
        }
    }

    fn handle_notification(&self, object: Value) {
        let notification: Notification = match serde_json::from_value(object) {
            Ok(notification) => notification,
            Err(e) => {
                debug!(error = %e, "discarding malformed notification");
                return;
            }
        };

        let names = match &self.inner.hooks.notification_names {
            Some(translate) => translate(&notification.method),
            None => vec![notification.method.clone()],
        };
        for method in names {
            let _ = self.inner.events.send(ClientEvent::Notification {
                method,
                params: notification.params.clone(),
            });
        }
    }

    async fn handle_request(&self, object: Value) {
        let request: Request = match serde_json::from_value(object) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "discarding malformed request");
                return;
            }
        };

        let guard = self.inner.on_request.read().await;
        match guard.as_ref() {
            Some(handler) => handler(request),
            // Known gap: without a handler, remote requests go nowhere.
            None => debug!(method = %request.method, "no request handler configured; dropped"),
        }
    }
}
