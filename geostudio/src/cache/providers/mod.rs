//! Object store provider implementations.
//!
//! Each provider implements the `ObjectStore` trait used as the durable tier
//! of the [`CacheStore`](crate::cache::CacheStore).
//!
//! # Available Providers
//!
//! - [`HttpObjectStore`]: S3-compatible bucket over HTTP
//! - [`MemoryObjectStore`]: In-memory store using moka, for tests and
//!   deployments without a bucket

mod http;
mod memory;

pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;
