//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::str::FromStr;

use super::file::{
    parse_bool, parse_optional_path, parse_path, parse_value, ConfigError, ConfigFile,
};

/// Every setting of [`ConfigFile`], in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    OverpassUrl,
    OverpassTimeout,
    OverpassMaxAttempts,
    OverpassAdminLevel,
    PointsSampleSize,
    StorageEndpoint,
    StorageBucket,
    StorageLocalDir,
    StorageProbeKey,
    CacheAlgorithmVersion,
    CacheEnabled,
    LockPollIntervalSecs,
    LoggingDirectory,
    LoggingFile,
}

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        use ConfigKey::*;
        &[
            OverpassUrl,
            OverpassTimeout,
            OverpassMaxAttempts,
            OverpassAdminLevel,
            PointsSampleSize,
            StorageEndpoint,
            StorageBucket,
            StorageLocalDir,
            StorageProbeKey,
            CacheAlgorithmVersion,
            CacheEnabled,
            LockPollIntervalSecs,
            LoggingDirectory,
            LoggingFile,
        ]
    }

    pub fn section(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            OverpassUrl | OverpassTimeout | OverpassMaxAttempts | OverpassAdminLevel => "overpass",
            PointsSampleSize => "points",
            StorageEndpoint | StorageBucket | StorageLocalDir | StorageProbeKey => "storage",
            CacheAlgorithmVersion | CacheEnabled => "cache",
            LockPollIntervalSecs => "lock",
            LoggingDirectory | LoggingFile => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        use ConfigKey::*;
        match self {
            OverpassUrl => "url",
            OverpassTimeout => "timeout",
            OverpassMaxAttempts => "max_attempts",
            OverpassAdminLevel => "admin_level",
            PointsSampleSize => "sample_size",
            StorageEndpoint => "endpoint",
            StorageBucket => "bucket",
            StorageLocalDir => "local_dir",
            StorageProbeKey => "probe_key",
            CacheAlgorithmVersion => "algorithm_version",
            CacheEnabled => "enabled",
            LockPollIntervalSecs => "poll_interval_secs",
            LoggingDirectory => "directory",
            LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written in the file; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        use ConfigKey::*;
        match self {
            OverpassUrl => config.overpass.url.clone(),
            OverpassTimeout => config.overpass.timeout_secs.to_string(),
            OverpassMaxAttempts => config.overpass.max_attempts.to_string(),
            OverpassAdminLevel => config.overpass.admin_level.to_string(),
            PointsSampleSize => config.points.sample_size.to_string(),
            StorageEndpoint => config.storage.endpoint.clone().unwrap_or_default(),
            StorageBucket => config.storage.bucket.clone(),
            StorageLocalDir => config
                .storage
                .local_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            StorageProbeKey => config.storage.probe_key.clone(),
            CacheAlgorithmVersion => config.cache.algorithm_version.clone(),
            CacheEnabled => config.cache.enabled.to_string(),
            LockPollIntervalSecs => config.lock.poll_interval_secs.to_string(),
            LoggingDirectory => config.logging.directory.display().to_string(),
            LoggingFile => config.logging.file.clone(),
        }
    }

    /// Parses `value` and stores it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        use ConfigKey::*;
        let name = self.name();
        match self {
            OverpassUrl => config.overpass.url = value.trim().to_string(),
            OverpassTimeout => config.overpass.timeout_secs = parse_value(&name, value)?,
            OverpassMaxAttempts => config.overpass.max_attempts = parse_value(&name, value)?,
            OverpassAdminLevel => config.overpass.admin_level = parse_value(&name, value)?,
            PointsSampleSize => config.points.sample_size = parse_value(&name, value)?,
            StorageEndpoint => {
                let value = value.trim();
                config.storage.endpoint = (!value.is_empty()).then(|| value.to_string());
            }
            StorageBucket => config.storage.bucket = value.trim().to_string(),
            StorageLocalDir => config.storage.local_dir = parse_optional_path(value),
            StorageProbeKey => config.storage.probe_key = value.trim().to_string(),
            CacheAlgorithmVersion => config.cache.algorithm_version = value.trim().to_string(),
            CacheEnabled => config.cache.enabled = parse_bool(&name, value)?,
            LockPollIntervalSecs => config.lock.poll_interval_secs = parse_value(&name, value)?,
            LoggingDirectory => config.logging.directory = parse_path(value),
            LoggingFile => config.logging.file = value.trim().to_string(),
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
