use crate::error::ContractError;
use crate::sink::{LogSink, LogType};
use serde_json::Value;

/// A sink that simply drops all records.
///
/// Useful for measuring the cost of normalization alone, and for tests
/// that don't care about delivery.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write(&self, _log_type: LogType, _record: Value) -> Result<(), ContractError> {
        Ok(())
    }
}
