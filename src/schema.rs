use crate::error::ContractError;
use jsonschema::Validator;
use serde_json::{json, Value};

/// JSON Schema every outgoing record must satisfy.
pub fn api_log_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "environment": { "type": "string", "enum": ["dev", "test", "prod"] },
            "body": { "type": "object" },
            "browser": { "type": "object" },
            "cookies": { "type": "object" },
            "headers": { "type": "object" },
            "os": { "type": "object" },
            "runtime": { "type": "object" },
            "sdk": { "type": "object" },
            "message": { "type": "string", "minLength": 1 },
            "details": { "type": "string", "minLength": 1 },
            "severity": { "type": "string", "enum": ["error", "debug", "warning", "info"] },
            "metadata": { "type": "object" }
        },
        "required": ["environment", "message", "details", "severity"],
        "additionalProperties": false
    })
}

/// Compiled record schema. Accepts or rejects a record with a reason.
pub struct RecordSchema {
    validator: Validator,
}

impl RecordSchema {
    pub fn new() -> Result<Self, ContractError> {
        let validator = jsonschema::validator_for(&api_log_schema())
            .map_err(|e| ContractError::InvalidSchema(e.to_string()))?;
        Ok(RecordSchema { validator })
    }

    /// Validate a merged record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record conforms.
    /// - `Err(text)` with the first violation and where it occurred.
    pub fn validate(&self, record: &Value) -> Result<(), String> {
        match self.validator.iter_errors(record).next() {
            None => Ok(()),
            Some(e) => Err(format!("{} at {}", e, e.instance_path)),
        }
    }
}
