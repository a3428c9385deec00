use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;

/// Header carrying the logs-service API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the logs-service client id.
pub const API_CLIENT_HEADER: &str = "x-api-client";

/// One outbound submission.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub url: &'a str,
    pub key: &'a str,
    pub client: &'a str,
    pub body: &'a Value,
}

/// Asynchronous HTTP client used to deliver validated records.
///
/// Implementations perform exactly one request per call and report the
/// response status. Retries, timeouts and TLS are entirely up to the
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `submission.body` as JSON to `submission.url` with the API key
    /// and client headers.
    ///
    /// **Returns**
    /// - `Ok(status)` for any HTTP response, successful or not.
    /// - `Err(..)` if no response was received (connection, DNS, TLS...).
    async fn post(&self, submission: Submission<'_>) -> Result<u16, Box<dyn Error + Send + Sync>>;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use reqwest::Client;

    /// `reqwest`-backed [`Transport`].
    #[derive(Clone, Default)]
    pub struct HttpTransport {
        client: Client,
    }

    impl HttpTransport {
        pub fn new() -> Self {
            Self { client: Client::new() }
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn post(&self, submission: Submission<'_>) -> Result<u16, Box<dyn Error + Send + Sync>> {
            let resp = self
                .client
                .post(submission.url)
                .header(API_KEY_HEADER, submission.key)
                .header(API_CLIENT_HEADER, submission.client)
                .json(submission.body)
                .send()
                .await?;
            Ok(resp.status().as_u16())
        }
    }
}
