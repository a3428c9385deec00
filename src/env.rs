//! Environment variable names used to configure the logs-service
//! middleware.
//!
//! These are purely helpers; [`ApiLogConfig`](crate::config::ApiLogConfig)
//! is the only place that reads them.

/// Base URL of the logs-service endpoint records are posted to.
pub const LOGS_SERVICE_URL_ENV: &str = "LOGS_SERVICE_URL";

/// API key sent as `x-api-key`.
pub const LOGS_SERVICE_KEY_ENV: &str = "LOGS_SERVICE_KEY";

/// Client id sent as `x-api-client`.
pub const LOGS_SERVICE_CLIENT_ENV: &str = "LOGS_SERVICE_CLIENT";

/// Explicit deployment stage, e.g. `dev`, `test`, `prod`.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Development-mode switch; `development` maps to the `dev` stage.
pub const NODE_ENV_ENV: &str = "NODE_ENV";

/// Read an environment variable, treating unset and empty as absent.
pub fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Read an environment variable lowercased and trimmed, treating unset and
/// blank as absent.
pub fn env_normalized(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}
