//! Application bootstrap implementation.
//!
//! `GeoStudioApp` wires the components in dependency order:
//!
//! 1. HTTP client and retrying fetcher
//! 2. Point source
//! 3. Object store (remote bucket or in-memory), local mirror, storage probe
//! 4. Lock coordinator and orchestrator with the registered scorers
//! 5. Service facade

use std::sync::Arc;

use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::{CacheStore, HttpObjectStore, LocalMirror, MemoryObjectStore, ObjectStore};
use crate::fetch::{ReqwestClient, RetryFetcher};
use crate::lock::LockCoordinator;
use crate::orchestrator::{Orchestrator, Scorer};
use crate::points::PointSource;
use crate::scope::{Dimension, ScopeRegistry};
use crate::service::GeoStudioService;
use crate::telemetry::{RequestMetrics, TelemetrySnapshot};

/// A fully wired GeoStudio instance.
///
/// # Example
///
/// ```ignore
/// use geostudio::app::{AppConfig, GeoStudioApp};
///
/// let app = GeoStudioApp::start(config, scorers, scopes).await?;
/// let document = app.service().scope("cycling", "cycling-score", "Nantes").await?;
/// ```
pub struct GeoStudioApp {
    service: Arc<GeoStudioService<ReqwestClient>>,
    cache: CacheStore,
    metrics: Arc<RequestMetrics>,
    storage_ok: bool,
    config: AppConfig,
}

impl GeoStudioApp {
    /// Start the application.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `scorers` - Scoring function per dimension
    /// * `scopes` - Scopes persisted for each dimension
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the storage
    /// endpoint is invalid. An unreachable store is only logged.
    pub async fn start(
        config: AppConfig,
        scorers: Vec<(Dimension, Arc<dyn Scorer>)>,
        scopes: ScopeRegistry,
    ) -> Result<Self, AppError> {
        info!("Starting GeoStudio");

        let client = ReqwestClient::with_timeout(config.http_timeout_secs)?;
        let points = PointSource::new(RetryFetcher::new(client, config.max_attempts))
            .with_endpoint(config.overpass_url.clone())
            .with_admin_level(config.admin_level);

        let cache = Self::build_cache(&config)?;
        let storage_ok = cache.probe(&config.probe_key).await;

        let metrics = Arc::new(RequestMetrics::new());
        let locks = Arc::new(LockCoordinator::with_poll_interval(config.lock_poll_interval));

        let mut orchestrator = Orchestrator::new(cache.clone(), scopes, locks)
            .with_algorithm_version(config.algorithm_version.clone())
            .with_metrics(Arc::clone(&metrics));
        for (dimension, scorer) in scorers {
            if orchestrator.scopes().scopes(dimension).is_empty() {
                warn!(dimension = %dimension, "Scorer registered for a dimension without scopes");
            }
            orchestrator = orchestrator.with_scorer(dimension, scorer);
        }

        info!(
            version = %orchestrator.version_directory(),
            cache_mode = ?config.cache_mode,
            "Orchestrator ready"
        );

        let service = GeoStudioService::new(Arc::new(orchestrator), Arc::new(points))
            .with_sample_size(config.sample_size);

        Ok(Self {
            service: Arc::new(service),
            cache,
            metrics,
            storage_ok,
            config,
        })
    }

    fn build_cache(config: &AppConfig) -> Result<CacheStore, AppError> {
        let durable: Arc<dyn ObjectStore> = match &config.storage_endpoint {
            Some(endpoint) => {
                let store = HttpObjectStore::new(endpoint, config.bucket.clone())?;
                info!(endpoint = %endpoint, bucket = %config.bucket, "Using remote object storage");
                Arc::new(store)
            }
            None => {
                warn!("No storage endpoint configured, artifacts are kept in memory only");
                Arc::new(MemoryObjectStore::default())
            }
        };

        let mut cache = CacheStore::new(durable).with_mode(config.cache_mode);
        if let Some(dir) = &config.local_dir {
            info!(directory = %dir.display(), "Local cache mirror enabled");
            cache = cache.with_local_mirror(LocalMirror::new(dir.clone()));
        }
        Ok(cache)
    }

    pub fn service(&self) -> &Arc<GeoStudioService<ReqwestClient>> {
        &self.service
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Whether the storage probe succeeded at startup.
    pub fn storage_ok(&self) -> bool {
        self.storage_ok
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.metrics.snapshot()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::cache::CacheMode;
    use crate::orchestrator::{FnScorer, ScoringError};
    use crate::scope::ScopeDefinition;

    fn scorers() -> Vec<(Dimension, Arc<dyn Scorer>)> {
        let scorer = FnScorer::new(|city: String| async move {
            Ok::<_, ScoringError>(json!({ "city": city, "score": 3 }))
        });
        vec![(Dimension::Walking, Arc::new(scorer) as Arc<dyn Scorer>)]
    }

    fn scopes() -> ScopeRegistry {
        ScopeRegistry::new()
            .with_scope(Dimension::Walking, ScopeDefinition::identity("full"))
            .with_scope(Dimension::Walking, ScopeDefinition::pointer("walking-score", "/score"))
    }

    #[tokio::test]
    async fn test_start_in_memory_with_mirror() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::default().with_local_dir(temp.path());

        let app = GeoStudioApp::start(config, scorers(), scopes()).await.unwrap();
        assert!(app.storage_ok());

        let score = app.service().scope("walking", "walking-score", "Lyon").await.unwrap();
        assert_eq!(score, json!(3));

        let snapshot = app.telemetry_snapshot();
        assert_eq!(snapshot.computations_started, 1);
        assert_eq!(snapshot.scopes_written, 2);

        // Both scopes were mirrored to disk.
        let key = app.service().orchestrator().cache_key(Dimension::Walking, "Lyon", "full");
        assert!(temp.path().join(key.path()).exists());
    }

    #[tokio::test]
    async fn test_bypass_mode_always_computes() {
        let config = AppConfig::default().with_cache_mode(CacheMode::Bypass);
        let app = GeoStudioApp::start(config, scorers(), scopes()).await.unwrap();

        app.service().scope("walking", "full", "Lyon").await.unwrap();
        app.service().scope("walking", "full", "Lyon").await.unwrap();
        assert_eq!(app.telemetry_snapshot().computations_started, 2);
    }

    #[tokio::test]
    async fn test_invalid_storage_endpoint() {
        let config = AppConfig::default().with_storage_endpoint("not a url");
        let result = GeoStudioApp::start(config, scorers(), scopes()).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
