//! Integration tests for the produce/consume HTTP API.

use std::collections::HashSet;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use proglog_log::{Log, LogConfig, Record, RecordLog};
use proglog_server::{ConsumeResponse, LogServer, ProduceResponse, ServerConfig, router};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

fn setup() -> (Router, Arc<Log>) {
    proglog_logging::init_testing();
    let log = Arc::new(Log::new());
    (router(log.clone()), log)
}

async fn send(app: &Router, method: Method, body: impl Into<Body>) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(method)
        .uri("/")
        .body(body.into())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn produce(app: &Router, value: &str) -> u64 {
    let body = json!({ "record": { "value": encode(value) } }).to_string();
    let (status, body) = send(app, Method::POST, body).await;
    assert_eq!(status, StatusCode::OK, "body: {:?}", body);
    serde_json::from_slice::<ProduceResponse>(&body).unwrap().offset
}

async fn consume(app: &Router, offset: u64) -> (StatusCode, Bytes) {
    let body = json!({ "offset": offset }).to_string();
    send(app, Method::GET, body).await
}

fn encode(value: &str) -> String {
    serde_json::to_value(Record::new(value.to_string())).unwrap()["value"]
        .as_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// Produce / Consume
// ============================================================================

#[tokio::test]
async fn test_produce_and_consume_roundtrip() {
    let (app, _log) = setup();

    assert_eq!(produce(&app, "hello").await, 0);
    assert_eq!(produce(&app, "world").await, 1);

    let (status, body) = consume(&app, 0).await;
    assert_eq!(status, StatusCode::OK);
    let res: ConsumeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(res.record.value, "hello");
    assert_eq!(res.record.offset, 0);

    let (status, body) = consume(&app, 1).await;
    assert_eq!(status, StatusCode::OK);
    let res: ConsumeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(res.record.value, "world");
    assert_eq!(res.record.offset, 1);

    let (status, _) = consume(&app, 2).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_consume_on_empty_log_is_not_found() {
    let (app, _log) = setup();

    let (status, body) = consume(&app, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8_lossy(&body).contains("offset out of range"));
}

#[tokio::test]
async fn test_wire_format() {
    let (app, _log) = setup();

    let (status, body) = send(
        &app,
        Method::POST,
        r#"{"record":{"value":"aGVsbG8=","offset":42}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], br#"{"offset":0}"#);

    let (status, body) = send(&app, Method::GET, r#"{"offset":0}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], br#"{"record":{"value":"aGVsbG8=","offset":0}}"#);
}

#[tokio::test]
async fn test_produce_writes_through_to_injected_log() {
    let (app, log) = setup();

    produce(&app, "direct").await;

    assert_eq!(log.len(), 1);
    assert_eq!(log.read(0).unwrap().value, "direct");
}

#[tokio::test]
async fn test_multi_megabyte_record_roundtrip() {
    let (app, log) = setup();
    let payload: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let body = serde_json::to_string(&json!({ "record": Record::new(payload.clone()) })).unwrap();
    assert!(body.len() > 4 * 1024 * 1024);
    let (status, body) = send(&app, Method::POST, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<ProduceResponse>(&body).unwrap().offset, 0);
    assert_eq!(log.len(), 1);

    let (status, body) = consume(&app, 0).await;
    assert_eq!(status, StatusCode::OK);
    let res: ConsumeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(res.record.value.as_ref(), payload.as_slice());
}

#[tokio::test]
async fn test_trailing_data_after_body_is_ignored() {
    let (app, log) = setup();

    let (status, body) = send(&app, Method::POST, r#"{"record":{"value":"aGVsbG8="}}x"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], br#"{"offset":0}"#);
    assert_eq!(log.read(0).unwrap().value, "hello");

    let (status, body) = send(&app, Method::GET, r#"{"offset":0} trailing"#).await;
    assert_eq!(status, StatusCode::OK);
    let res: ConsumeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(res.record.value, "hello");
}

#[tokio::test]
async fn test_reads_are_repeatable() {
    let (app, _log) = setup();
    produce(&app, "same").await;

    let first = consume(&app, 0).await;
    let second = consume(&app, 0).await;
    assert_eq!(first, second);
}

// ============================================================================
// Bad Requests
// ============================================================================

#[tokio::test]
async fn test_produce_rejects_malformed_bodies() {
    let (app, log) = setup();

    for body in [
        "",
        "not json",
        "{}",
        r#"{"record":{}}"#,
        r#"{"record":{"value":"%%%"}}"#,
        r#"{"record":{"value":123}}"#,
    ] {
        let (status, _) = send(&app, Method::POST, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    }

    assert!(log.is_empty());
}

#[tokio::test]
async fn test_consume_rejects_malformed_bodies() {
    let (app, _log) = setup();
    produce(&app, "present").await;

    for body in [
        "",
        "{}",
        r#"{"offset":-1}"#,
        r#"{"offset":"0"}"#,
        r#"{"offset":0.5}"#,
    ] {
        let (status, _) = send(&app, Method::GET, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let (app, _log) = setup();

    let (status, _) = send(&app, Method::DELETE, "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Log Failures
// ============================================================================

#[tokio::test]
async fn test_capacity_exceeded_is_server_error() {
    proglog_logging::init_testing();
    let log = Arc::new(Log::with_config(LogConfig::default().with_max_records(1)));
    let app = router(log);

    assert_eq!(produce(&app, "fits").await, 0);

    let body = json!({ "record": { "value": encode("overflow") } }).to_string();
    let (status, body) = send(&app, Method::POST, body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8_lossy(&body).contains("capacity"));
}

#[tokio::test]
async fn test_any_record_log_can_be_served() {
    proglog_logging::init_testing();
    let log: Arc<dyn RecordLog> = Arc::new(Log::new());
    let app = router(log);

    assert_eq!(produce(&app, "via trait").await, 0);
    let (status, _) = consume(&app, 0).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_produce_assigns_distinct_offsets() {
    let (app, log) = setup();
    let requests = 100u64;

    let mut handles = Vec::new();
    for i in 0..requests {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let offset = produce(&app, &format!("record {}", i)).await;
            (offset, i)
        }));
    }

    let mut offsets = HashSet::new();
    for handle in handles {
        let (offset, i) = handle.await.unwrap();
        assert!(offsets.insert(offset));
        assert_eq!(
            log.read(offset).unwrap().value,
            Bytes::from(format!("record {}", i))
        );
    }

    assert_eq!(offsets, (0..requests).collect::<HashSet<_>>());

    for offset in 0..requests {
        let (status, _) = consume(&app, offset).await;
        assert_eq!(status, StatusCode::OK);
    }
}

// ============================================================================
// End to End
// ============================================================================

async fn raw_request(addr: std::net::SocketAddr, method: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_server_over_tcp_with_graceful_shutdown() {
    proglog_logging::init_testing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = LogServer::new(Arc::new(Log::new()), ServerConfig::default());
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = shutdown_rx.await;
    }));

    let response = raw_request(addr, "POST", r#"{"record":{"value":"aGVsbG8="}}"#).await;
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.ends_with(r#"{"offset":0}"#), "{}", response);

    let response = raw_request(addr, "GET", r#"{"offset":0}"#).await;
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains(r#""value":"aGVsbG8=""#), "{}", response);

    let response = raw_request(addr, "GET", r#"{"offset":1}"#).await;
    assert!(response.starts_with("HTTP/1.1 404"), "{}", response);

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
