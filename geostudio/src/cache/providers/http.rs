//! S3-compatible object store over plain HTTP.
//!
//! Objects are addressed path-style: `{endpoint}/{bucket}/{key}`. Request
//! signing is not performed here; the bucket must accept the requests as
//! sent (public-write bucket, signing proxy, or pre-authorized endpoint).

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};

use crate::cache::traits::{ObjectStore, StoreError};
use crate::BoxFuture;

/// Default request timeout for object store calls in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Object store backed by an S3-compatible HTTP endpoint.
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: Url,
    bucket: String,
}

impl HttpObjectStore {
    /// Creates a store for `bucket` at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Provider` if the endpoint is not a valid base URL
    /// or the HTTP client cannot be built.
    pub fn new(endpoint: &str, bucket: impl Into<String>) -> Result<Self, StoreError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| StoreError::Provider(format!("Invalid endpoint {}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(StoreError::Provider(format!(
                "Endpoint {} cannot be used as a base URL",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            bucket: bucket.into(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Builds the object URL, percent-encoding every path segment.
    pub fn object_url(&self, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.push(&self.bucket);
            segments.extend(key.split('/'));
        }
        url
    }
}

impl ObjectStore for HttpObjectStore {
    fn get_object(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(self.object_url(&key))
                .send()
                .await
                .map_err(|e| StoreError::Http(format!("GET {} failed: {}", key, e)))?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                return Err(StoreError::Status {
                    status: status.as_u16(),
                    key,
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| StoreError::Http(format!("Failed to read {}: {}", key, e)))?;
            Ok(Some(body.to_vec()))
        })
    }

    fn put_object(&self, key: &str, body: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let response = self
                .client
                .put(self.object_url(&key))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(|e| StoreError::Http(format!("PUT {} failed: {}", key, e)))?;

            if !response.status().is_success() {
                return Err(StoreError::Status {
                    status: response.status().as_u16(),
                    key,
                });
            }
            Ok(())
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
