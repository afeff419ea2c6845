//! Application error types.

use std::fmt;

use crate::cache::StoreError;
use crate::fetch::FetchError;

/// Errors that can occur while starting the application.
#[derive(Debug)]
pub enum AppError {
    /// Failed to build the HTTP client.
    HttpClient(FetchError),

    /// The object store could not be configured.
    Storage(StoreError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            AppError::Storage(e) => write!(f, "Failed to configure storage: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::HttpClient(e) => Some(e),
            AppError::Storage(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        AppError::HttpClient(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Storage(e)
    }
}
