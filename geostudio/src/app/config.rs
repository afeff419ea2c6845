//! Application configuration for GeoStudioApp.
//!
//! `AppConfig` gathers every setting needed to wire the service together,
//! translated from the user's [`ConfigFile`] in one place.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheMode;
use crate::config::{ConfigFile, DEFAULT_BUCKET, DEFAULT_PROBE_KEY};
use crate::fetch::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use crate::lock::DEFAULT_POLL_INTERVAL;
use crate::orchestrator::DEFAULT_ALGORITHM_VERSION;
use crate::points::{DEFAULT_ADMIN_LEVEL, DEFAULT_OVERPASS_URL, DEFAULT_SAMPLE_SIZE};

/// Top-level configuration passed to `GeoStudioApp::start()`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Overpass interpreter URL.
    pub overpass_url: String,

    /// Per-attempt HTTP timeout in seconds.
    pub http_timeout_secs: u64,

    /// Attempts per map API request.
    pub max_attempts: u32,

    /// Admin level used for place-name queries.
    pub admin_level: u8,

    /// Transit stops kept per city.
    pub sample_size: usize,

    /// Object store endpoint; an in-memory store is used when unset.
    pub storage_endpoint: Option<String>,

    pub bucket: String,

    /// Local mirror root.
    pub local_dir: Option<PathBuf>,

    /// Object read at startup to check storage.
    pub probe_key: String,

    pub algorithm_version: String,

    pub cache_mode: CacheMode,

    pub lock_poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            admin_level: DEFAULT_ADMIN_LEVEL,
            sample_size: DEFAULT_SAMPLE_SIZE,
            storage_endpoint: None,
            bucket: DEFAULT_BUCKET.to_string(),
            local_dir: None,
            probe_key: DEFAULT_PROBE_KEY.to_string(),
            algorithm_version: DEFAULT_ALGORITHM_VERSION.to_string(),
            cache_mode: CacheMode::Enabled,
            lock_poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AppConfig {
    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            overpass_url: config.overpass.url.clone(),
            http_timeout_secs: config.overpass.timeout_secs,
            max_attempts: config.overpass.max_attempts,
            admin_level: config.overpass.admin_level,
            sample_size: config.points.sample_size,
            storage_endpoint: config.storage.endpoint.clone(),
            bucket: config.storage.bucket.clone(),
            local_dir: config.storage.local_dir.clone(),
            probe_key: config.storage.probe_key.clone(),
            algorithm_version: config.cache.algorithm_version.clone(),
            cache_mode: if config.cache.enabled {
                CacheMode::Enabled
            } else {
                CacheMode::Bypass
            },
            lock_poll_interval: Duration::from_secs(config.lock.poll_interval_secs.max(1)),
        }
    }

    pub fn with_storage_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.storage_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = Some(dir.into());
        self
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    pub fn with_lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_interval = interval;
        self
    }
}
