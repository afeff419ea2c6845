//! Single-flight gate for computations.
//!
//! The [`LockCoordinator`] holds the set of `(city, dimension)` keys whose
//! computation is in flight. A key is in the set at most once; it is added
//! by a successful acquisition and removed when the owning
//! [`ComputationGuard`] is dropped, on success, error or panic alike.
//!
//! Waiting is polling-based: a caller that finds its key taken re-attempts
//! acquisition every poll interval. Releases also wake waiters immediately,
//! so the interval only bounds the worst case.
//!
//! The lock is process-local and advisory. A second process does not share
//! the set.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tokio::sync::Notify;
use tracing::debug;

use crate::scope::Dimension;

/// Default interval between acquisition attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Identifies one in-flight computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
    city: String,
    dimension: Dimension,
}

impl LockKey {
    pub fn new(city: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            city: city.into(),
            dimension,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.city, self.dimension)
    }
}

/// Process-wide set of in-flight computation keys.
pub struct LockCoordinator {
    active: DashSet<LockKey>,
    released: Notify,
    poll_interval: Duration,
}

impl Default for LockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl LockCoordinator {
    /// Creates a coordinator polling every [`DEFAULT_POLL_INTERVAL`].
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            active: DashSet::new(),
            released: Notify::new(),
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Records `key` as in flight if it is free.
    ///
    /// Returns `false` without waiting if the key is already held.
    pub fn try_acquire(&self, key: &LockKey) -> bool {
        self.active.insert(key.clone())
    }

    /// Removes `key` from the in-flight set and wakes waiters.
    ///
    /// Returns `false` if the key was not held.
    pub fn release(&self, key: &LockKey) -> bool {
        let removed = self.active.remove(key).is_some();
        if removed {
            self.released.notify_waiters();
        }
        removed
    }

    pub fn is_locked(&self, key: &LockKey) -> bool {
        self.active.contains(key)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Acquires `key` if free, returning a guard that releases it on drop.
    pub fn try_lock(self: &Arc<Self>, key: &LockKey) -> Option<ComputationGuard> {
        if self.try_acquire(key) {
            Some(ComputationGuard {
                coordinator: Arc::clone(self),
                key: key.clone(),
            })
        } else {
            None
        }
    }

    /// Waits until `key` is free, then acquires it.
    ///
    /// Only callers of the same key wait on each other.
    pub async fn acquire(self: &Arc<Self>, key: LockKey) -> ComputationGuard {
        loop {
            // Register interest before the attempt so a release between the
            // attempt and the wait is not missed.
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(guard) = self.try_lock(&key) {
                return guard;
            }

            debug!(key = %key, active = self.active_count(), "Already being processed, waiting");
            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

/// Scoped ownership of a lock key.
///
/// Dropping the guard releases the key exactly once.
pub struct ComputationGuard {
    coordinator: Arc<LockCoordinator>,
    key: LockKey,
}

impl ComputationGuard {
    pub fn key(&self) -> &LockKey {
        &self.key
    }
}

impl Drop for ComputationGuard {
    fn drop(&mut self) {
        self.coordinator.release(&self.key);
        debug!(key = %self.key, "Lock released");
    }
}

impl fmt::Debug for ComputationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputationGuard")
            .field("key", &self.key)
            .finish()
    }
}
