//! INI configuration file.
//!
//! ```ini
//! [overpass]
//! url = https://overpass-api.de/api/interpreter
//! timeout = 120
//! max_attempts = 5
//! admin_level = 8
//!
//! [points]
//! sample_size = 100
//!
//! [storage]
//! endpoint = https://s3.fr-par.scw.cloud
//! bucket = geostudio
//! local_dir = ~/.geostudio/cache
//! probe_key = yo.txt
//!
//! [cache]
//! algorithm_version = 1
//! enabled = true
//!
//! [lock]
//! poll_interval_secs = 10
//!
//! [logging]
//! directory = ~/.geostudio/logs
//! file = geostudio.log
//! ```
//!
//! Missing keys take their defaults; unknown keys are ignored.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::fetch::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use crate::orchestrator::DEFAULT_ALGORITHM_VERSION;
use crate::points::{DEFAULT_ADMIN_LEVEL, DEFAULT_OVERPASS_URL, DEFAULT_SAMPLE_SIZE};

/// Default bucket name.
pub const DEFAULT_BUCKET: &str = "geostudio";

/// Object read at startup to check that storage answers.
pub const DEFAULT_PROBE_KEY: &str = "yo.txt";

/// Default lock poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Map API settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassSettings {
    pub url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub admin_level: u8,
}

/// Point sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsSettings {
    pub sample_size: usize,
}

/// Artifact storage settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    /// Object store endpoint; artifacts stay in memory when unset.
    pub endpoint: Option<String>,
    pub bucket: String,
    /// Local mirror root; no mirror when unset.
    pub local_dir: Option<PathBuf>,
    pub probe_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub algorithm_version: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LockSettings {
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

/// Contents of `~/.geostudio/config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub overpass: OverpassSettings,
    pub points: PointsSettings,
    pub storage: StorageSettings,
    pub cache: CacheSettings,
    pub lock: LockSettings,
    pub logging: LoggingSettings,
}

/// Directory holding the configuration, cache and logs.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".geostudio")
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Expands a leading `~` to the home directory.
fn expand_tilde(value: &str) -> PathBuf {
    match value.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(value)),
        None => PathBuf::from(value),
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let base = config_directory();
        Self {
            overpass: OverpassSettings {
                url: DEFAULT_OVERPASS_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                admin_level: DEFAULT_ADMIN_LEVEL,
            },
            points: PointsSettings {
                sample_size: DEFAULT_SAMPLE_SIZE,
            },
            storage: StorageSettings {
                endpoint: None,
                bucket: DEFAULT_BUCKET.to_string(),
                local_dir: Some(base.join("cache")),
                probe_key: DEFAULT_PROBE_KEY.to_string(),
            },
            cache: CacheSettings {
                algorithm_version: DEFAULT_ALGORITHM_VERSION.to_string(),
                enabled: true,
            },
            lock: LockSettings {
                poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            },
            logging: LoggingSettings {
                directory: base.join("logs"),
                file: "geostudio.log".to_string(),
            },
        }
    }
}

impl ConfigFile {
    /// Loads the configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads the configuration from `path`, defaulting when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parses configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in super::ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Serializes every setting, defaults included.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in super::ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Writes the configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)
    }
}

/// Parses `value` for `key`.
pub(super) fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parses an optional path, empty meaning unset.
pub(super) fn parse_optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| expand_tilde(value))
}

/// Parses a path, expanding `~`.
pub(super) fn parse_path(value: &str) -> PathBuf {
    expand_tilde(value.trim())
}

/// Parses a boolean written as true/false, yes/no or 1/0.
pub(super) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
