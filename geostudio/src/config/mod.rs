//! User configuration.
//!
//! Settings live in `~/.geostudio/config.ini` and are addressed on the
//! command line as `section.key` through [`ConfigKey`].

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, CacheSettings, ConfigError, ConfigFile, LockSettings,
    LoggingSettings, OverpassSettings, PointsSettings, StorageSettings, DEFAULT_BUCKET,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_PROBE_KEY,
};
pub use keys::ConfigKey;
