#![cfg(feature = "http")]

use std::sync::Arc;

use api_log_sink::config::{ApiLogConfig, UseApiLoggerOptions};
use api_log_sink::{
    use_api_logger, ApiLogMiddleware, ApiLogger, DeliveryError, LogType, Logger, LoggerMiddleware,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn middleware_for(server: &MockServer) -> ApiLogMiddleware {
    let options = UseApiLoggerOptions {
        url: Some(format!("{}/test", server.uri())),
        key: Some("k".into()),
        client: Some("c".into()),
    };
    temp_env::with_vars_unset(["ENVIRONMENT", "NODE_ENV"], || use_api_logger(Some(options)))
        .expect("configured middleware")
}

async fn call(middleware: &ApiLogMiddleware, log_type: LogType, args: Vec<Value>) -> Result<(), DeliveryError> {
    let (tx, rx) = oneshot::channel();
    middleware
        .handle(
            log_type,
            args,
            Some(Box::new(move |result: Result<(), DeliveryError>| {
                let _ = tx.send(result);
            })),
        )
        .expect("well-formed call");
    rx.await.expect("completion callback invoked")
}

#[tokio::test]
async fn accepted_record_completes_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test"))
        .and(header("x-api-key", "k"))
        .and(header("x-api-client", "c"))
        .and(body_partial_json(json!({
            "message": "m",
            "details": "d",
            "environment": "prod",
            "severity": "info"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let middleware = middleware_for(&server);
    let result = call(&middleware, LogType::Info, vec![json!({ "message": "m", "details": "d" })]).await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn forbidden_reports_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let middleware = middleware_for(&server);
    let err = call(&middleware, LogType::Info, vec![json!({ "message": "m", "details": "d" })])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("403"), "{err}");
}

#[tokio::test]
async fn created_is_not_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let middleware = middleware_for(&server);
    let err = call(&middleware, LogType::Warn, vec![json!({ "message": "m", "details": "d" })])
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::UnexpectedStatus(201)));
}

#[tokio::test]
async fn invalid_record_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let middleware = middleware_for(&server);
    let err = call(&middleware, LogType::Error, vec![json!({ "message": "m" })])
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Validation(_)));
}

#[tokio::test]
async fn connection_failure_is_reported_through_callback() {
    let config = ApiLogConfig {
        url: "http://127.0.0.1:1/test".into(),
        key: "k".into(),
        client: "c".into(),
        environment: "test".into(),
    };
    let middleware =
        ApiLogMiddleware::new(config, Arc::new(api_log_sink::transport::HttpTransport::new())).unwrap();

    let err = call(&middleware, LogType::Debug, vec![json!({ "message": "m", "details": "d" })])
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
}

#[tokio::test]
async fn api_logger_through_facade_posts_canonical_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test"))
        .and(body_partial_json(json!({
            "message": "orders: payment declined",
            "details": "orders: payment declined",
            "severity": "warning",
            "metadata": { "orderId": { "value": 42 } }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let logger = Logger::new().with_middleware(Arc::new(middleware_for(&server)));
    let api_log = ApiLogger::new(Arc::new(logger)).with_prefix("orders: ");
    api_log
        .warn(vec![json!("payment declined"), json!({ "orderId": { "value": 42 } })])
        .unwrap();

    // Delivery is fire-and-continue; give the spawned request time to land.
    for _ in 0..50 {
        if !server.received_requests().await.unwrap_or_default().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["metadata"].get("stackTrace").is_some());
}
