//! Common types and utilities shared across CLI commands.

use std::future::Future;
use std::path::Path;

use clap::ValueEnum;
use geostudio::app::{AppConfig, GeoStudioApp};
use geostudio::config::{config_file_path, ConfigError, ConfigFile};
use geostudio::scope::ScopeRegistry;
use geostudio::Dimension;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Metric family selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DimensionArg {
    /// Cyclability
    Cycling,
    /// Walkability
    Walking,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Cycling => Dimension::Cycling,
            DimensionArg::Walking => Dimension::Walking,
        }
    }
}

/// Load the configuration file, falling back to defaults when unreadable.
///
/// The load error is handed back instead of logged: logging is configured
/// from this file and is not running yet.
pub fn load_config() -> (ConfigFile, Option<ConfigError>) {
    load_config_from(&config_file_path())
}

/// [`load_config`] for an explicit path.
pub fn load_config_from(path: &Path) -> (ConfigFile, Option<ConfigError>) {
    match ConfigFile::load_from(path) {
        Ok(config) => (config, None),
        Err(e) => (ConfigFile::default(), Some(e)),
    }
}

/// Run `future` to completion on a fresh multi-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    Ok(runtime.block_on(future))
}

/// Start the application for commands that only read points or cache.
///
/// No scorer is registered: the CLI never computes scopes.
pub async fn start_app(config: &ConfigFile) -> Result<GeoStudioApp, CliError> {
    let app_config = AppConfig::from_config_file(config);
    Ok(GeoStudioApp::start(app_config, Vec::new(), ScopeRegistry::new()).await?)
}

/// Print a JSON document, pretty or compact.
pub fn print_json(value: &Value, pretty: bool) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
