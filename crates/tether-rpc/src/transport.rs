//! Transport abstraction for posting request bodies to an endpoint.
//!
//! The dispatch core only needs "post this body, give me the response body".
//! [`HttpTransport`] does that over HTTP with `reqwest`; tests substitute
//! their own [`Transport`] implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::endpoint::Endpoint;

/// Default timeout applied by [`HttpTransport`] (10 s)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` sent by [`HttpTransport`]
pub const DEFAULT_USER_AGENT: &str = concat!("tether/", env!("CARGO_PKG_VERSION"));

/// Posts a request body to an endpoint and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the request could not be completed.
    async fn post(&self, endpoint: &Endpoint, body: String) -> Result<String, TransportError>;
}

/// Errors that can occur while talking to the endpoint
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Transport failure: {0}")]
    Other(String),
}

/// JSON-over-HTTP transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the given request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the underlying client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &Endpoint, body: String) -> Result<String, TransportError> {
        let response = self
            .client
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
