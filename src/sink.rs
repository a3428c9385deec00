use crate::error::{ContractError, DeliveryError};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Severity tag used by the logging facade to select a handler.
///
/// This is distinct from the wire-level [`Severity`](crate::record::Severity):
/// `Default` and `Info` share a wire value, and `Trace` has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogType {
    Default,
    Debug,
    Error,
    Info,
    Trace,
    Warn,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Default => "default",
            LogType::Debug => "debug",
            LogType::Error => "error",
            LogType::Info => "info",
            LogType::Trace => "trace",
            LogType::Warn => "warn",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = ContractError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "default" => Ok(LogType::Default),
            "debug" => Ok(LogType::Debug),
            "error" => Ok(LogType::Error),
            "info" => Ok(LogType::Info),
            "trace" => Ok(LogType::Trace),
            "warn" => Ok(LogType::Warn),
            other => Err(ContractError::InvalidSeverityTag(other.to_string())),
        }
    }
}

/// Completion callback for a single delivery attempt.
///
/// Receives `Ok(())` when the record was accepted, or the
/// [`DeliveryError`] that stopped it.
pub type Done = Box<dyn FnOnce(Result<(), DeliveryError>) + Send + 'static>;

/// Completion callback that ignores the outcome.
pub fn noop_done() -> Done {
    Box::new(|_| {})
}

/// Severity-indexed destination for canonical records.
///
/// [`ApiLogger`](crate::logger::ApiLogger) delegates every normalized
/// record here. Returning `Err` is reserved for contract violations; any
/// asynchronous delivery outcome stays opaque to the caller.
pub trait LogSink: Send + Sync {
    /// Hand a canonical record to the action bound to `log_type`.
    fn write(&self, log_type: LogType, record: Value) -> Result<(), ContractError>;

    fn debug(&self, record: Value) -> Result<(), ContractError> {
        self.write(LogType::Debug, record)
    }

    fn error(&self, record: Value) -> Result<(), ContractError> {
        self.write(LogType::Error, record)
    }

    fn info(&self, record: Value) -> Result<(), ContractError> {
        self.write(LogType::Info, record)
    }

    fn trace(&self, record: Value) -> Result<(), ContractError> {
        self.write(LogType::Trace, record)
    }

    fn warn(&self, record: Value) -> Result<(), ContractError> {
        self.write(LogType::Warn, record)
    }
}

/// Handler registered with the [`Logger`](crate::facade::Logger) facade.
///
/// Implementations receive the severity tag, the positional arguments of
/// the log call and an optional completion callback. Delivery outcomes
/// must go through `done`; only contract violations may be returned.
pub trait LoggerMiddleware: Send + Sync {
    fn handle(&self, log_type: LogType, args: Vec<Value>, done: Option<Done>) -> Result<(), ContractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        for tag in ["default", "debug", "error", "info", "trace", "warn"] {
            let parsed: LogType = tag.parse().unwrap();
            assert_eq!(parsed.as_str(), tag);
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "fatal".parse::<LogType>().unwrap_err();
        assert!(matches!(err, ContractError::InvalidSeverityTag(ref tag) if tag == "fatal"));
    }
}
