//! GeoStudio - cached cyclability and walkability datasets for cities
//!
//! This library coordinates the expensive per-city computations behind the
//! cycling and walking metrics: it fetches source points from the Overpass
//! API, filters them geographically, and caches every computed scope in a
//! two-tier store so that each city is only ever computed once per version
//! directory.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │ GeoStudio    │───►│ Orchestrator │───►│ CacheStore           │
//! │ Service      │    │              │    │  local mirror (fs)   │
//! │              │    │  lock ───────┼──► │  object store        │
//! │              │    │  scorer      │    └──────────────────────┘
//! │              │    │  scopes      │
//! │              │    └──────────────┘
//! │              │───►PointSource ───► RetryFetcher ───► Overpass
//! └──────────────┘
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod app;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod geo;
pub mod lock;
pub mod logging;
pub mod orchestrator;
pub mod points;
pub mod scope;
pub mod service;
pub mod telemetry;

pub use scope::Dimension;

/// Boxed future type for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
