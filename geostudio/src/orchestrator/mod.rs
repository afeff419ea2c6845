//! Scope request orchestration.
//!
//! The [`Orchestrator`] answers `(dimension, scope, city)` requests from the
//! cache when it can and otherwise computes the city once, persisting every
//! scope of the dimension so that later requests for sibling scopes hit.
//!
//! # Flow
//!
//! ```text
//! request ──► cache read ──hit──► return
//!                │
//!               miss
//!                ▼
//!          lock (city, dimension) ──held──► wait ──► cache read ──hit──► return
//!                │                                        │
//!                ▼                                       miss
//!             scorer ◄────────────────────────────────────┘
//!                │
//!                ▼
//!       fan-out: select + write every scope (all attempted)
//!                │
//!                ▼
//!      release lock, return requested scope
//! ```
//!
//! Waiters re-read the cache after acquiring the lock, so concurrent
//! requests for a cold city trigger one computation.

mod scorer;
mod types;

pub use scorer::{FnScorer, Scorer, ScoringError};
pub use types::{ComputationJob, FanoutReport, JobState, OrchestratorError, ScopeOutcome};

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::cache::{CacheKey, CacheStore, VersionDirectory};
use crate::lock::{LockCoordinator, LockKey};
use crate::scope::{Dimension, ScopeRegistry};
use crate::telemetry::RequestMetrics;

/// Algorithm version used when none is configured.
pub const DEFAULT_ALGORITHM_VERSION: &str = "1";

/// Serves scope requests from cache or by computing them.
pub struct Orchestrator {
    cache: CacheStore,
    scopes: ScopeRegistry,
    locks: Arc<LockCoordinator>,
    scorers: HashMap<Dimension, Arc<dyn Scorer>>,
    algorithm_version: String,
    fixed_version: Option<VersionDirectory>,
    metrics: Arc<RequestMetrics>,
}

impl Orchestrator {
    /// Creates an orchestrator without scorers.
    ///
    /// Register one scorer per dimension with [`with_scorer`](Self::with_scorer)
    /// before serving requests for it.
    pub fn new(cache: CacheStore, scopes: ScopeRegistry, locks: Arc<LockCoordinator>) -> Self {
        Self {
            cache,
            scopes,
            locks,
            scorers: HashMap::new(),
            algorithm_version: DEFAULT_ALGORITHM_VERSION.to_string(),
            fixed_version: None,
            metrics: Arc::new(RequestMetrics::new()),
        }
    }

    pub fn with_scorer(mut self, dimension: Dimension, scorer: Arc<dyn Scorer>) -> Self {
        self.scorers.insert(dimension, scorer);
        self
    }

    pub fn with_algorithm_version(mut self, version: impl Into<String>) -> Self {
        self.algorithm_version = version.into();
        self
    }

    /// Pins the version directory instead of deriving it from the clock.
    pub fn with_version_directory(mut self, version: VersionDirectory) -> Self {
        self.fixed_version = Some(version);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<RequestMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        &self.metrics
    }

    pub fn locks(&self) -> &Arc<LockCoordinator> {
        &self.locks
    }

    pub fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// The version directory requests are currently served from.
    pub fn version_directory(&self) -> VersionDirectory {
        match &self.fixed_version {
            Some(version) => version.clone(),
            None => VersionDirectory::current(&self.algorithm_version),
        }
    }

    pub fn cache_key(&self, dimension: Dimension, city: &str, scope: &str) -> CacheKey {
        CacheKey::new(self.version_directory(), city, scope, dimension)
    }

    /// Reads a scope from the cache without computing it.
    pub async fn cached(&self, dimension: Dimension, city: &str, scope: &str) -> Option<Value> {
        self.cache.read(&self.cache_key(dimension, city, scope)).await
    }

    /// Returns the `scope` document of `dimension` for `city`.
    ///
    /// # Errors
    ///
    /// * `UnknownScope` / `NoScorer` - the request cannot be served at all
    /// * `UnknownCity` - the scorer failed for this city
    /// * `Persist` - the requested scope could not be written to the
    ///   durable store
    pub async fn request(
        &self,
        dimension: Dimension,
        scope: &str,
        city: &str,
    ) -> Result<Value, OrchestratorError> {
        if self.scopes.find(dimension, scope).is_none() {
            return Err(OrchestratorError::UnknownScope {
                dimension,
                scope: scope.to_string(),
            });
        }
        let scorer = self
            .scorers
            .get(&dimension)
            .cloned()
            .ok_or(OrchestratorError::NoScorer(dimension))?;

        let mut job = ComputationJob::new(dimension, city, scope);
        let version = self.version_directory();
        let key = CacheKey::new(version.clone(), city, scope, dimension);

        if let Some(artifact) = self.cache.read(&key).await {
            self.metrics.cache_hit();
            job.transition(JobState::HitReturn);
            return Ok(artifact);
        }
        info!(city, dimension = %dimension, scope, "City not cached yet");

        let lock_key = LockKey::new(city, dimension);
        let guard = match self.locks.try_lock(&lock_key) {
            Some(guard) => guard,
            None => {
                job.transition(JobState::LockWait);
                self.metrics.lock_wait();
                let guard = self.locks.acquire(lock_key).await;
                if let Some(artifact) = self.cache.read(&key).await {
                    self.metrics.cache_hit();
                    job.transition(JobState::HitReturn);
                    return Ok(artifact);
                }
                guard
            }
        };

        self.metrics.cache_miss();
        job.transition(JobState::Computing);
        self.metrics.computation_started();
        let full = match scorer.compute(city).await {
            Ok(full) => full,
            Err(source) => {
                self.metrics.computation_failed();
                job.transition(JobState::Failed);
                warn!(city, dimension = %dimension, error = %source, "Computation failed");
                return Err(OrchestratorError::UnknownCity {
                    city: city.to_string(),
                    source,
                });
            }
        };

        job.transition(JobState::Fanout);
        let mut report = self.fan_out(&version, dimension, city, &full).await;
        drop(guard);

        self.metrics
            .scopes_persisted(report.written(), report.failed());
        for outcome in report.outcomes().iter().filter(|o| o.scope != scope) {
            if let Err(e) = &outcome.result {
                warn!(city, scope = %outcome.scope, error = %e, "Scope not persisted");
            }
        }

        // The requested scope is registered, so its outcome is present.
        let requested = report.take(scope).ok_or_else(|| OrchestratorError::UnknownScope {
            dimension,
            scope: scope.to_string(),
        })?;

        match requested.result {
            Ok(()) => {
                job.transition(JobState::Done);
                info!(
                    city,
                    dimension = %dimension,
                    written = report.written() + 1,
                    "City computed and cached"
                );
                Ok(requested.artifact)
            }
            Err(source) => {
                job.transition(JobState::Failed);
                error!(city, scope, error = %source, "Requested scope not persisted");
                Err(OrchestratorError::Persist {
                    scope: scope.to_string(),
                    source,
                })
            }
        }
    }

    /// Selects and writes every scope of `dimension`, attempting all of them.
    async fn fan_out(
        &self,
        version: &VersionDirectory,
        dimension: Dimension,
        city: &str,
        full: &Value,
    ) -> FanoutReport {
        let writes = self.scopes.scopes(dimension).iter().map(|definition| {
            let key = CacheKey::new(version.clone(), city, definition.name(), dimension);
            let artifact = definition.select(full);
            async move {
                let result = self.cache.write(&key, &artifact).await;
                ScopeOutcome {
                    scope: key.scope().to_string(),
                    artifact,
                    result,
                }
            }
        });

        FanoutReport::new(join_all(writes).await)
    }
}
