//! HTTP client abstraction for testability

use std::sync::Arc;
use std::time::Duration;

use super::error::FetchError;
use crate::BoxFuture;

/// Default timeout for a single HTTP attempt in seconds.
///
/// Overpass queries for large cities routinely take tens of seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an error for transport failures and
    /// non-success statuses.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>>;
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>> {
        (**self).get(url)
    }
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("geostudio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Http(format!("Request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(FetchError::Status {
                    status: response.status().as_u16(),
                    url,
                });
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))
        })
    }
}
