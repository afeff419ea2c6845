//! Request telemetry for observability.
//!
//! Lock-free atomic counters recorded by the orchestrator, copied into a
//! point-in-time [`TelemetrySnapshot`] for display.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator ─────► RequestMetrics ─────► TelemetrySnapshot ─────► CLI, logs
//!                     (atomic counters)     (point-in-time copy)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use geostudio::telemetry::RequestMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(RequestMetrics::new());
//! metrics.cache_miss();
//! metrics.computation_started();
//!
//! let snapshot = metrics.snapshot();
//! println!("Hit rate: {:.0}%", snapshot.hit_rate() * 100.0);
//! ```

mod metrics;
mod snapshot;

pub use metrics::RequestMetrics;
pub use snapshot::TelemetrySnapshot;
