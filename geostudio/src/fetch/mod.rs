//! Network fetching with bounded retries.
//!
//! The map-data API is flaky: requests time out or fail transiently often
//! enough that every call goes through [`RetryFetcher`], which retries
//! immediately up to a fixed number of attempts.
//!
//! # Example
//!
//! ```ignore
//! use geostudio::fetch::{ReqwestClient, RetryFetcher};
//!
//! let fetcher = RetryFetcher::new(ReqwestClient::new()?, 5);
//! let body = fetcher.fetch("https://overpass-api.de/api/interpreter?data=...").await?;
//! ```

mod error;
mod http;
mod retry;

pub use error::FetchError;
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use retry::{retry, RetryFetcher, DEFAULT_MAX_ATTEMPTS};

#[cfg(test)]
pub use http::tests::MockHttpClient;
