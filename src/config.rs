use crate::env::{
    env_non_empty, env_normalized, ENVIRONMENT_ENV, LOGS_SERVICE_CLIENT_ENV, LOGS_SERVICE_KEY_ENV,
    LOGS_SERVICE_URL_ENV, NODE_ENV_ENV,
};
use crate::error::ContractError;

/// Explicit options for [`use_api_logger`](crate::middleware::use_api_logger).
///
/// Every field is optional; missing or empty values fall back to the
/// matching `LOGS_SERVICE_*` environment variable.
#[derive(Clone, Debug, Default)]
pub struct UseApiLoggerOptions {
    pub url: Option<String>,
    pub key: Option<String>,
    pub client: Option<String>,
}

/// Resolved, read-only configuration of one middleware instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiLogConfig {
    pub url: String,
    pub key: String,
    pub client: String,
    /// Deployment stage stamped on every outgoing record.
    pub environment: String,
}

impl ApiLogConfig {
    /// Resolve options against the process environment.
    ///
    /// **Returns**
    /// - `Err(ContractError::MissingConfig)` if `url`, `key` or `client`
    ///   is absent after the environment fallback.
    pub fn resolve(options: &UseApiLoggerOptions) -> Result<Self, ContractError> {
        let url = required(&options.url, "url", LOGS_SERVICE_URL_ENV)?;
        let key = required(&options.key, "key", LOGS_SERVICE_KEY_ENV)?;
        let client = required(&options.client, "client", LOGS_SERVICE_CLIENT_ENV)?;

        Ok(ApiLogConfig {
            url,
            key,
            client,
            environment: resolve_environment(),
        })
    }
}

fn required(option: &Option<String>, field: &'static str, env: &'static str) -> Result<String, ContractError> {
    option
        .clone()
        .filter(|value| !value.is_empty())
        .or_else(|| env_non_empty(env))
        .ok_or(ContractError::MissingConfig { field, env })
}

/// Deployment stage: `ENVIRONMENT` if set, `dev` when `NODE_ENV` is
/// `development`, otherwise `prod`.
pub fn resolve_environment() -> String {
    env_normalized(ENVIRONMENT_ENV)
        .or_else(|| {
            env_normalized(NODE_ENV_ENV)
                .filter(|mode| mode == "development")
                .map(|_| "dev".to_string())
        })
        .unwrap_or_else(|| "prod".to_string())
}
