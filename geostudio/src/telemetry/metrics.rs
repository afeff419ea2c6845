//! Atomic request counters.

use std::sync::atomic::{AtomicU64, Ordering};

use super::snapshot::TelemetrySnapshot;

/// Counters shared by every request handled by one orchestrator.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    lock_waits: AtomicU64,
    computations_started: AtomicU64,
    computations_failed: AtomicU64,
    scopes_written: AtomicU64,
    scope_writes_failed: AtomicU64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request was answered from cache, before or after waiting on a lock.
    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A request went on to compute its city.
    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A request found its key locked and had to wait.
    pub fn lock_wait(&self) {
        self.lock_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn computation_started(&self) {
        self.computations_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn computation_failed(&self) {
        self.computations_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the outcome of one fan-out.
    pub fn scopes_persisted(&self, written: usize, failed: usize) {
        self.scopes_written.fetch_add(written as u64, Ordering::Relaxed);
        self.scope_writes_failed
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            lock_waits: self.lock_waits.load(Ordering::Relaxed),
            computations_started: self.computations_started.load(Ordering::Relaxed),
            computations_failed: self.computations_failed.load(Ordering::Relaxed),
            scopes_written: self.scopes_written.load(Ordering::Relaxed),
            scope_writes_failed: self.scope_writes_failed.load(Ordering::Relaxed),
        }
    }
}
