//! Two-tier cache for computed artifacts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 CacheStore                   │
//! │                                              │
//! │  CacheKey → "<MM>-<YYYY>/<version>/<city>.   │
//! │              <scope>[.cycling].json"         │
//! └───────────────┬──────────────────┬───────────┘
//!                 │                  │
//!                 ▼                  ▼
//! ┌───────────────────────┐  ┌───────────────────────┐
//! │ LocalMirror (fast)    │  │ Arc<dyn ObjectStore>  │
//! │ filesystem, best      │  │ (durable, authori-    │
//! │ effort                │  │ tative)               │
//! └───────────────────────┘  └───────────────────────┘
//! ```
//!
//! There is no eviction: when the month bucket or the algorithm version
//! changes, new keys are derived and old artifacts are simply never read
//! again.

mod key;
mod local;
mod store;
mod traits;

pub mod providers;

pub use key::{CacheKey, VersionDirectory};
pub use local::LocalMirror;
pub use providers::{HttpObjectStore, MemoryObjectStore};
pub use store::{CacheError, CacheMode, CacheStore};
pub use traits::{ObjectStore, StoreError};
