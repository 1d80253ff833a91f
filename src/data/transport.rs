//! HTTP transport for upstream JSON endpoints
//!
//! The client only needs "GET this URL as JSON within a deadline", so that is
//! all [`Transport`] exposes. [`ReqwestTransport`] is the real implementation;
//! tests substitute stubs that count calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when fetching upstream data
#[derive(Debug, Error)]
pub enum FetchError {
    /// A primary API call was attempted without a token
    #[error("SUPERHERO_API_TOKEN is not set. Get a token at https://superheroapi.com/")]
    MissingToken,

    /// Connection failure, timeout, non-2xx status or undecodable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `{"response": "error", ...}`
    #[error("API returned an error: {0}")]
    ErrorResponse(String),

    /// The body was valid JSON of the wrong shape
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(&'static str),
}

/// Fetches JSON documents over HTTP
#[async_trait]
pub trait Transport: Send + Sync {
    /// GETs `url` and decodes the body as JSON, failing after `timeout`
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        (**self).get_json(url, timeout).await
    }
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Creates a transport sending `Accept: application/json` on every request
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Creates a transport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        let value = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(value)
    }
}
