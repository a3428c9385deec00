use std::error::Error;
use std::sync::Arc;

use api_log_sink::config::ApiLogConfig;
use api_log_sink::transport::{Submission, Transport};
use api_log_sink::{ApiLogMiddleware, ApiLogger, DeliveryError, Logger, LogType, LoggerMiddleware};
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::oneshot;

/// Example of plugging a custom client into the middleware by
/// implementing `Transport`. This one prints the record and accepts it.
struct StdoutTransport;

#[async_trait]
impl Transport for StdoutTransport {
    async fn post(&self, submission: Submission<'_>) -> Result<u16, Box<dyn Error + Send + Sync>> {
        println!("[{} as {}] {}", submission.url, submission.client, submission.body);
        Ok(200)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ApiLogConfig {
        url: "stdout://logs".into(),
        key: "local".into(),
        client: "custom-transport-example".into(),
        environment: "dev".into(),
    };
    let middleware = Arc::new(ApiLogMiddleware::new(config, Arc::new(StdoutTransport))?);

    let (tx, rx) = oneshot::channel();
    middleware.handle(
        LogType::Info,
        vec![json!({ "message": "direct call", "details": "sent straight to the middleware" })],
        Some(Box::new(move |result: Result<(), DeliveryError>| {
            let _ = tx.send(result);
        })),
    )?;
    println!("direct call completed: {:?}", rx.await?);

    let record = middleware.compose(
        LogType::Warn,
        &[json!({ "message": "awaited call", "details": "outcome returned in place" })],
    )?;
    println!("awaited call completed: {:?}", middleware.deliver(record).await);

    let log = ApiLogger::new(Arc::new(Logger::new().with_middleware(middleware)));
    log.debug(("through the api logger", "with a captured stack trace"))?;

    tokio::task::yield_now().await;
    Ok(())
}
