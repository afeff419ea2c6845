//! Bounded, immediate retries.
//!
//! Retries are unconditional: any error triggers another attempt until the
//! attempt budget is spent. There is no delay between attempts, the
//! per-attempt timeout of the transport is the only pacing.

use std::fmt;
use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::FetchError;
use super::http::HttpClient;

/// Default number of attempts for map-data requests.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Runs `op` until it succeeds or `max_attempts` attempts have failed.
///
/// A `max_attempts` of zero is treated as one. Each failure is logged with
/// the number of attempts remaining.
///
/// # Arguments
///
/// * `what` - Label used in logs and in the exhausted error
/// * `max_attempts` - Maximum number of attempts (including the first)
/// * `op` - Produces one attempt
pub async fn retry<T, E, F, Fut>(what: &str, max_attempts: u32, mut op: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(what, attempt, "Fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                let remaining = max_attempts - attempt;
                if remaining == 0 {
                    warn!(what, attempts = attempt, error = %e, "Fetch failed, no tries left");
                    return Err(FetchError::Exhausted {
                        what: what.to_string(),
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                warn!(what, error = %e, remaining, "Fetch failed, retrying");
            }
        }
    }
}

/// HTTP fetcher that retries every request a fixed number of times.
pub struct RetryFetcher<C> {
    client: C,
    max_attempts: u32,
}

impl<C: HttpClient> RetryFetcher<C> {
    /// Creates a fetcher around `client`.
    pub fn new(client: C, max_attempts: u32) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the configured attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches `url` with the configured attempt budget.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch_with_attempts(url, self.max_attempts).await
    }

    /// Fetches `url`, giving up after `max_attempts` consecutive failures.
    pub async fn fetch_with_attempts(
        &self,
        url: &str,
        max_attempts: u32,
    ) -> Result<Vec<u8>, FetchError> {
        retry(url, max_attempts, || self.client.get(url)).await
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// Decoding errors are not retried: the body arrived intact and another
    /// attempt would most likely return the same document.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.fetch(url).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
