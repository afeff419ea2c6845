//! Core traits for the durable cache tier.
//!
//! The `ObjectStore` trait is the minimal bucket interface the cache needs:
//! read an object by key, write an object by key. Keys are the derived cache
//! paths (`"10-2026/v3/Nantes.cycling-score.cycling.json"`), values are raw
//! bytes, in practice UTF-8 JSON.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable, identical to the local mirror layout
//! - **Vec<u8> values**: Raw bytes, no serialization opinions imposed
//! - **Not-found is not an error**: `get_object` returns `Ok(None)`
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support

use std::sync::Arc;

use thiserror::Error;

use crate::BoxFuture;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during store operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure talking to a remote store.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote store rejected the request.
    #[error("Store answered {status} for {key}")]
    Status { status: u16, key: String },

    /// Provider-specific error.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Durable key-value object storage.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
pub trait ObjectStore: Send + Sync {
    /// Retrieve an object by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the object exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get_object(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>>;

    /// Store an object, replacing any previous value.
    fn put_object(&self, key: &str, body: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}

impl<S: ObjectStore + ?Sized> ObjectStore for Arc<S> {
    fn get_object(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
        (**self).get_object(key)
    }

    fn put_object(&self, key: &str, body: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
        (**self).put_object(key, body)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Status {
            status: 403,
            key: "10-2026/v1/Nantes.score.json".to_string(),
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("Nantes.score.json"));
    }

    #[test]
    fn test_store_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }
}
