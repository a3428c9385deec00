use crate::config::{ApiLogConfig, UseApiLoggerOptions};
use crate::error::{ContractError, DeliveryError};
use crate::record::Severity;
use crate::schema::RecordSchema;
use crate::sink::{noop_done, Done, LogType, LoggerMiddleware};
use crate::transport::{Submission, Transport};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// Map a facade severity tag to the wire severity.
///
/// `Trace` has no wire value and is rejected like any unknown tag.
pub fn severity_for(log_type: LogType) -> Result<Severity, ContractError> {
    match log_type {
        LogType::Error => Ok(Severity::Error),
        LogType::Debug => Ok(Severity::Debug),
        LogType::Warn => Ok(Severity::Warning),
        LogType::Info | LogType::Default => Ok(Severity::Info),
        LogType::Trace => Err(ContractError::InvalidSeverityTag(log_type.to_string())),
    }
}

/// Middleware that validates records and stores them in the logs service.
///
/// Each call with a valid record spawns exactly one POST on the current
/// Tokio runtime and returns immediately; the outcome is reported through
/// the completion callback. Invalid records are rejected without touching
/// the network.
#[derive(Clone)]
pub struct ApiLogMiddleware {
    config: Arc<ApiLogConfig>,
    schema: Arc<RecordSchema>,
    transport: Arc<dyn Transport>,
}

impl ApiLogMiddleware {
    /// Build a middleware from an already resolved configuration.
    pub fn new(config: ApiLogConfig, transport: Arc<dyn Transport>) -> Result<Self, ContractError> {
        Ok(ApiLogMiddleware {
            config: Arc::new(config),
            schema: Arc::new(RecordSchema::new()?),
            transport,
        })
    }

    /// Resolve `options` against the environment and build a middleware
    /// around `transport`.
    pub fn from_options(
        options: &UseApiLoggerOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ContractError> {
        Self::new(ApiLogConfig::resolve(options)?, transport)
    }

    /// Merge the first positional argument with the resolved environment
    /// and the mapped severity. Both always override caller fields.
    ///
    /// A non-object fragment contributes nothing and the result then fails
    /// validation.
    pub fn compose(&self, log_type: LogType, args: &[Value]) -> Result<Value, ContractError> {
        let severity = severity_for(log_type)?;

        let mut record = match args.first() {
            Some(Value::Object(fragment)) => fragment.clone(),
            _ => Map::new(),
        };
        record.insert("environment".to_string(), Value::String(self.config.environment.clone()));
        record.insert("severity".to_string(), Value::String(severity.as_str().to_string()));
        Ok(Value::Object(record))
    }

    /// Validate and submit an already composed record, awaiting the
    /// outcome in place instead of through a callback.
    pub async fn deliver(&self, record: Value) -> Result<(), DeliveryError> {
        self.schema.validate(&record).map_err(DeliveryError::Validation)?;
        submit(&*self.transport, &self.config, &record).await
    }
}

async fn submit(transport: &dyn Transport, config: &ApiLogConfig, record: &Value) -> Result<(), DeliveryError> {
    debug!(url = %config.url, "submitting api log");
    let status = transport
        .post(Submission {
            url: &config.url,
            key: &config.key,
            client: &config.client,
            body: record,
        })
        .await
        .map_err(DeliveryError::Transport)?;

    if status != 200 {
        return Err(DeliveryError::UnexpectedStatus(status));
    }
    Ok(())
}

impl LoggerMiddleware for ApiLogMiddleware {
    fn handle(&self, log_type: LogType, args: Vec<Value>, done: Option<Done>) -> Result<(), ContractError> {
        let done = done.unwrap_or_else(noop_done);
        let record = self.compose(log_type, &args)?;

        if let Err(reason) = self.schema.validate(&record) {
            debug!(%reason, "api log rejected by schema");
            done(Err(DeliveryError::Validation(reason)));
            return Ok(());
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                done(Err(DeliveryError::NoRuntime));
                return Ok(());
            }
        };

        let config = Arc::clone(&self.config);
        let transport = Arc::clone(&self.transport);
        runtime.spawn(async move {
            let result = submit(&*transport, &config, &record).await;
            if let Err(e) = &result {
                debug!(error = %e, "api log delivery failed");
            }
            done(result);
        });
        Ok(())
    }
}

/// Create a middleware that stores logs in the logs service over HTTP.
///
/// Missing `url`, `key` or `client` options fall back to
/// `LOGS_SERVICE_URL`, `LOGS_SERVICE_KEY` and `LOGS_SERVICE_CLIENT`.
///
/// ```no_run
/// use std::sync::Arc;
/// use api_log_sink::{console::TracingMiddleware, facade::{use_fallback, Logger}};
/// use api_log_sink::middleware::use_api_logger;
/// use api_log_sink::sink::LoggerMiddleware;
///
/// let middleware = use_api_logger(None)?;
/// let logger = Logger::new().with_middleware(use_fallback(vec![
///     Arc::new(middleware) as Arc<dyn LoggerMiddleware>,
///     Arc::new(TracingMiddleware),
/// ]));
/// # Ok::<(), api_log_sink::error::ContractError>(())
/// ```
#[cfg(feature = "http")]
pub fn use_api_logger(options: Option<UseApiLoggerOptions>) -> Result<ApiLogMiddleware, ContractError> {
    use crate::transport::HttpTransport;

    ApiLogMiddleware::from_options(&options.unwrap_or_default(), Arc::new(HttpTransport::new()))
}
