//! Fetch error types.

use thiserror::Error;

/// Errors that can occur while fetching remote data.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Every attempt failed.
    #[error("Fetch of {what} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        what: String,
        attempts: u32,
        last_error: String,
    },
}
