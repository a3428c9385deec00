use std::error::Error;

/// Programmer errors raised synchronously at the call site.
///
/// These never reach the network and are never reported through a
/// completion callback.
#[derive(thiserror::Error, Debug)]
pub enum ContractError {
    #[error("{name} must be of type {expected}")]
    InvalidArgumentType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("log type must come from enum, got {0:?}")]
    InvalidSeverityTag(String),

    #[error("{field} must be of type string (set it explicitly or via {env})")]
    MissingConfig {
        field: &'static str,
        env: &'static str,
    },

    #[error("record schema failed to compile: {0}")]
    InvalidSchema(String),
}

/// Failures on the delivery path, reported only through [`Done`](crate::sink::Done).
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("{0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    UnexpectedStatus(u16),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn Error + Send + Sync>),

    #[error("no tokio runtime available to submit the log")]
    NoRuntime,
}
