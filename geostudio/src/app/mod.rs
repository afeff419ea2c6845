//! Application bootstrap.
//!
//! `GeoStudioApp` builds every component from an [`AppConfig`] in the right
//! order and hands out the resulting [`GeoStudioService`](crate::service::GeoStudioService).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       GeoStudioApp                          │
//! │                                                             │
//! │  1. ReqwestClient ──► RetryFetcher ──► PointSource          │
//! │                                                             │
//! │  2. ObjectStore (bucket | memory) + LocalMirror             │
//! │     └── CacheStore ── probe at startup                      │
//! │                                                             │
//! │  3. LockCoordinator + scorers + scopes ──► Orchestrator     │
//! │                                                             │
//! │  4. GeoStudioService                                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::GeoStudioApp;
pub use config::AppConfig;
pub use error::AppError;
