use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved metadata key holding the call-site stack trace.
pub const STACK_TRACE_KEY: &str = "stackTrace";

/// Deployment stage a record was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Test,
    Prod,
}

/// Wire-level severity accepted by the logs service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Debug,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Debug => "debug",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A single metadata entry, serialized as `{ "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataValue {
    pub value: Value,
}

impl MetadataValue {
    pub fn new(value: impl Into<Value>) -> Self {
        MetadataValue { value: value.into() }
    }
}

/// Named metadata attached to a record.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Convert typed metadata into its JSON object form.
pub fn metadata_to_value(metadata: Metadata) -> Value {
    serde_json::to_value(metadata).unwrap_or_default()
}

/// Strictly typed log record understood by the logs service.
///
/// `environment` and `severity` are always overwritten on submission, so
/// callers normally leave them empty. The context objects are passed
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub message: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk: Option<Value>,
}

impl ApiLog {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        ApiLog {
            message: message.into(),
            details: details.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(name.into(), MetadataValue::new(value));
        self
    }
}

/// One resolved frame of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub is_native: bool,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub method: Option<String>,
    pub is_constructor: bool,
}

/// Value stored under `metadata.stackTrace.value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StackTrace {
    Frames(Vec<StackFrame>),
    Raw(String),
}
