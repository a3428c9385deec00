use crate::error::ContractError;
use crate::record::{metadata_to_value, ApiLog, Metadata, STACK_TRACE_KEY};
use crate::sink::{LogSink, LogType};
use crate::stacktrace;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Positional arguments of a single log call.
///
/// The accepted shapes are:
/// - a complete record object, passed through as-is;
/// - `message`;
/// - `message, details`;
/// - `message, metadata`;
/// - `message, details, metadata`.
///
/// Typed conversions exist for the common shapes. Arbitrary JSON values
/// can be supplied through `Vec<Value>` and are checked at call time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogArgs(Vec<Value>);

impl LogArgs {
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for LogArgs {
    fn from(args: Vec<Value>) -> Self {
        LogArgs(args)
    }
}

impl From<Value> for LogArgs {
    fn from(arg: Value) -> Self {
        LogArgs(vec![arg])
    }
}

impl From<&str> for LogArgs {
    fn from(message: &str) -> Self {
        LogArgs(vec![Value::from(message)])
    }
}

impl From<String> for LogArgs {
    fn from(message: String) -> Self {
        LogArgs(vec![Value::String(message)])
    }
}

impl From<ApiLog> for LogArgs {
    fn from(log: ApiLog) -> Self {
        LogArgs(vec![serde_json::to_value(log).unwrap_or_default()])
    }
}

impl From<(&str, &str)> for LogArgs {
    fn from((message, details): (&str, &str)) -> Self {
        LogArgs(vec![Value::from(message), Value::from(details)])
    }
}

impl From<(&str, Metadata)> for LogArgs {
    fn from((message, metadata): (&str, Metadata)) -> Self {
        LogArgs(vec![Value::from(message), metadata_to_value(metadata)])
    }
}

impl From<(&str, &str, Metadata)> for LogArgs {
    fn from((message, details, metadata): (&str, &str, Metadata)) -> Self {
        LogArgs(vec![
            Value::from(message),
            Value::from(details),
            metadata_to_value(metadata),
        ])
    }
}

/// Logger for strict API records.
///
/// Every call is normalized into one canonical record and handed to the
/// underlying [`LogSink`] action for its severity. Derived loggers created
/// with [`with_prefix`](ApiLogger::with_prefix) share the sink but carry
/// their own prefix.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use api_log_sink::{logger::ApiLogger, noop_sink::NoopSink, record::Metadata};
/// let log = ApiLogger::new(Arc::new(NoopSink));
/// log.debug("my message")?;
/// log.debug(("my message", "my details"))?;
/// log.debug(("my message with metadata", Metadata::new()))?;
/// # Ok::<(), api_log_sink::error::ContractError>(())
/// ```
#[derive(Clone)]
pub struct ApiLogger {
    sink: Arc<dyn LogSink>,
    prefix: Arc<str>,
}

impl ApiLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        ApiLogger { sink, prefix: Arc::from("") }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive a logger that prepends `prefix` to the message and details of
    /// shorthand calls. The prefix is appended to this logger's own prefix;
    /// `self` is left untouched.
    pub fn with_prefix(&self, prefix: impl AsRef<str>) -> Self {
        ApiLogger {
            sink: Arc::clone(&self.sink),
            prefix: Arc::from(format!("{}{}", self.prefix, prefix.as_ref())),
        }
    }

    pub fn debug(&self, args: impl Into<LogArgs>) -> Result<(), ContractError> {
        self.log(LogType::Debug, args)
    }

    pub fn error(&self, args: impl Into<LogArgs>) -> Result<(), ContractError> {
        self.log(LogType::Error, args)
    }

    pub fn info(&self, args: impl Into<LogArgs>) -> Result<(), ContractError> {
        self.log(LogType::Info, args)
    }

    pub fn trace(&self, args: impl Into<LogArgs>) -> Result<(), ContractError> {
        self.log(LogType::Trace, args)
    }

    pub fn warn(&self, args: impl Into<LogArgs>) -> Result<(), ContractError> {
        self.log(LogType::Warn, args)
    }

    /// Normalize `args` and delegate the record to the sink action for
    /// `log_type`.
    pub fn log(&self, log_type: LogType, args: impl Into<LogArgs>) -> Result<(), ContractError> {
        let record = normalize(args.into(), &self.prefix)?;
        self.sink.write(log_type, record)
    }
}

/// Resolve one call shape into a canonical record.
///
/// Shorthand forms get the prefix on `message` and `details` and a
/// `metadata.stackTrace` entry; caller metadata is merged after it, so an
/// explicit `stackTrace` key from the caller wins.
pub fn normalize(args: LogArgs, prefix: &str) -> Result<Value, ContractError> {
    let mut args = args.into_inner().into_iter();
    let first = args.next().unwrap_or(Value::Null);
    let second = args.next().unwrap_or(Value::Null);
    let third = args.next().unwrap_or(Value::Null);

    let message = match first {
        record @ Value::Object(_) => return Ok(record),
        Value::String(message) => message,
        _ => {
            return Err(ContractError::InvalidArgumentType {
                name: "messageOrLog",
                expected: "string or object",
            })
        }
    };

    let (details, metadata) = match second {
        Value::String(details) => (details, None),
        Value::Object(metadata) => (message.clone(), Some(metadata)),
        Value::Null => (message.clone(), None),
        _ => {
            return Err(ContractError::InvalidArgumentType {
                name: "detailsOrMetadata",
                expected: "string or object",
            })
        }
    };

    let metadata = match (metadata, third) {
        (Some(metadata), _) => Some(metadata),
        (None, Value::Null) => None,
        (None, Value::Object(metadata)) => Some(metadata),
        _ => {
            return Err(ContractError::InvalidArgumentType {
                name: "metadata",
                expected: "object",
            })
        }
    };

    let mut merged = Map::new();
    let mut stack_entry = Map::new();
    let stack = serde_json::to_value(stacktrace::capture())
        .unwrap_or_else(|_| Value::String(stacktrace::UNAVAILABLE_STACK.to_string()));
    stack_entry.insert("value".to_string(), stack);
    merged.insert(STACK_TRACE_KEY.to_string(), Value::Object(stack_entry));
    if let Some(metadata) = metadata {
        merged.extend(metadata);
    }

    let mut record = Map::new();
    record.insert("message".to_string(), Value::String(format!("{}{}", prefix, message)));
    record.insert("details".to_string(), Value::String(format!("{}{}", prefix, details)));
    record.insert("metadata".to_string(), Value::Object(merged));
    Ok(Value::Object(record))
}
