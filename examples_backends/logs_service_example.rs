use std::sync::Arc;

use api_log_sink::config::UseApiLoggerOptions;
use api_log_sink::console::TracingMiddleware;
use api_log_sink::init::init_tracing;
use api_log_sink::{
    use_api_logger, use_fallback, ApiLogger, Logger, LoggerMiddleware, Metadata, MetadataValue,
};
use tokio::time::{sleep, Duration};
use tracing::error;

/// Send logs to the logs service and fall back to the console when a
/// record is rejected. Configure with LOGS_SERVICE_URL, LOGS_SERVICE_KEY
/// and LOGS_SERVICE_CLIENT, or pass the options explicitly.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = UseApiLoggerOptions {
        url: std::env::var("LOGS_SERVICE_URL").ok().or(Some("http://127.0.0.1:8080/logs".into())),
        ..Default::default()
    };

    let logger = Logger::new().with_middleware(use_fallback(vec![
        Arc::new(use_api_logger(Some(options))?) as Arc<dyn LoggerMiddleware>,
        Arc::new(TracingMiddleware),
    ]));
    let log = ApiLogger::new(Arc::new(logger));

    init_tracing(log.with_prefix("[tracing] "))?;

    let mut metadata = Metadata::new();
    metadata.insert("orderId".into(), MetadataValue::new(42));

    let orders = log.with_prefix("[orders] ");
    orders.info("service started")?;
    orders.warn(("payment retried", "card issuer timed out on first attempt"))?;
    orders.error(("payment failed", "card declined", metadata))?;

    error!(details = "upstream returned 502", "inventory sync failed");

    // Submissions complete in the background.
    sleep(Duration::from_secs(2)).await;
    Ok(())
}
