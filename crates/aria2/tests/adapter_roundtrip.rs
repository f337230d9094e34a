//! End-to-end adapter tests against an in-process WebSocket mock daemon.

use aria2::{Aria2Client, Aria2Config, Call, ClientError};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

fn local_config(port: u16, secret: &str) -> Aria2Config {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    Aria2Config {
        host: "127.0.0.1".to_string(),
        port,
        secret: secret.to_string(),
        ..Default::default()
    }
}

/// Bind an ephemeral port and answer frames with `respond`.
async fn spawn_daemon(respond: impl Fn(Value) -> Value + Send + 'static) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            match msg {
                Message::Text(text) => {
                    let frame: Value = serde_json::from_str(&text).unwrap();
                    let response = respond(frame);
                    ws.send(Message::Text(response.to_string().into()))
                        .await
                        .unwrap();
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });
    port
}

#[tokio::test]
async fn call_is_namespaced_and_carries_the_token() {
    let port = spawn_daemon(|request| {
        assert_eq!(request["method"], json!("aria2.addUri"));
        assert_eq!(request["params"][0], json!("token:abc"));
        assert_eq!(request["params"][1], json!(["http://example.com/file"]));
        json!({"id": request["id"], "result": "2089b05ecca3d829"})
    })
    .await;

    let client = Aria2Client::new(local_config(port, "abc"));
    client.open().await.unwrap();

    let gid = client
        .call("addUri", vec![json!(["http://example.com/file"])])
        .await
        .unwrap()
        .await
        .unwrap();
    assert_eq!(gid, json!("2089b05ecca3d829"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn multicall_is_one_composite_request() {
    let port = spawn_daemon(|request| {
        assert_eq!(request["method"], json!("system.multicall"));
        // The composite request itself carries no token.
        let entries = request["params"][0].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["methodName"], json!("aria2.methodA"));
        assert_eq!(entries[0]["params"], json!(["token:abc", 1]));
        assert_eq!(entries[1]["methodName"], json!("aria2.methodB"));
        assert_eq!(entries[1]["params"], json!(["token:abc", 2]));
        json!({"id": request["id"], "result": [[1], [2]]})
    })
    .await;

    let client = Aria2Client::new(local_config(port, "abc"));
    client.open().await.unwrap();

    let results = client
        .multicall(vec![
            Call::new("methodA", vec![json!(1)]),
            Call::new("methodB", vec![json!(2)]),
        ])
        .await
        .unwrap()
        .await
        .unwrap();
    assert_eq!(results, json!([[1], [2]]));

    client.close().await.unwrap();
}

#[tokio::test]
async fn batch_members_are_each_decorated() {
    let port = spawn_daemon(|frame| {
        let requests = frame.as_array().expect("batch must be an array frame");
        for request in requests {
            assert_eq!(request["params"][0], json!("token:abc"));
            assert!(request["method"].as_str().unwrap().starts_with("aria2."));
        }
        let responses: Vec<Value> = requests
            .iter()
            .map(|r| json!({"id": r["id"], "result": "ok"}))
            .collect();
        Value::Array(responses)
    })
    .await;

    let client = Aria2Client::new(local_config(port, "abc"));
    client.open().await.unwrap();

    let replies = client
        .batch(vec![
            Call::new("methodA", vec![json!(1)]),
            Call::new("methodB", vec![json!(2)]),
        ])
        .await
        .unwrap();
    for reply in replies {
        assert_eq!(reply.await.unwrap(), json!("ok"));
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn list_methods_yields_bare_names() {
    let port = spawn_daemon(|request| {
        assert_eq!(request["method"], json!("system.listMethods"));
        json!({
            "id": request["id"],
            "result": ["aria2.addUri", "aria2.pause", "system.multicall"],
        })
    })
    .await;

    let client = Aria2Client::new(local_config(port, ""));
    client.open().await.unwrap();

    let methods = client.list_methods().await.unwrap();
    assert_eq!(methods, vec!["addUri", "pause", "system.multicall"]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn list_notifications_yields_bare_names() {
    let port = spawn_daemon(|request| {
        assert_eq!(request["method"], json!("system.listNotifications"));
        json!({
            "id": request["id"],
            "result": ["aria2.onDownloadStart", "aria2.onDownloadComplete"],
        })
    })
    .await;

    let client = Aria2Client::new(local_config(port, ""));
    client.open().await.unwrap();

    let notifications = client.list_notifications().await.unwrap();
    assert_eq!(notifications, vec!["onDownloadStart", "onDownloadComplete"]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn empty_secret_sends_params_untouched() {
    let port = spawn_daemon(|request| {
        assert_eq!(request["params"], json!([["http://example.com/file"]]));
        json!({"id": request["id"], "result": "gid"})
    })
    .await;

    let client = Aria2Client::new(local_config(port, ""));
    client.open().await.unwrap();

    client
        .call("addUri", vec![json!(["http://example.com/file"])])
        .await
        .unwrap()
        .await
        .unwrap();

    client.close().await.unwrap();
}

#[tokio::test]
async fn daemon_error_rejects_the_call() {
    let port = spawn_daemon(|request| {
        json!({"id": request["id"], "error": {"code": 1, "message": "Unauthorized"}})
    })
    .await;

    let client = Aria2Client::new(local_config(port, "wrong"));
    client.open().await.unwrap();

    let outcome = client.call("addUri", vec![]).await.unwrap().await;
    match outcome {
        Err(ClientError::Rpc(error)) => assert_eq!(error.message, "Unauthorized"),
        other => panic!("expected RPC error, got {other:?}"),
    }

    client.close().await.unwrap();
}
