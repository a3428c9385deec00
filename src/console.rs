use crate::error::ContractError;
use crate::sink::{Done, LogType, LoggerMiddleware};
use serde_json::Value;
use tracing::{debug, error, info, trace, warn};

/// Middleware that writes log calls to the local `tracing` subscriber.
///
/// Usually placed behind [`ApiLogMiddleware`](crate::middleware::ApiLogMiddleware)
/// in a [`Fallback`](crate::facade::Fallback) so that records the logs
/// service rejects still end up somewhere. Always completes successfully.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingMiddleware;

fn render(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl LoggerMiddleware for TracingMiddleware {
    fn handle(&self, log_type: LogType, args: Vec<Value>, done: Option<Done>) -> Result<(), ContractError> {
        let line = render(&args);
        match log_type {
            LogType::Error => error!("{}", line),
            LogType::Warn => warn!("{}", line),
            LogType::Info | LogType::Default => info!("{}", line),
            LogType::Debug => debug!("{}", line),
            LogType::Trace => trace!("{}", line),
        }

        if let Some(done) = done {
            done(Ok(()));
        }
        Ok(())
    }
}
