//! CLI error type.

use std::fmt;
use std::process;

use geostudio::app::AppError;
use geostudio::config::ConfigError;
use geostudio::service::ServiceError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or unreadable configuration.
    Config(String),
    /// The application failed to start.
    Startup(AppError),
    /// A request failed.
    Request(ServiceError),
    /// Storage did not answer the probe.
    StorageUnavailable(String),
    /// Failed to create the Tokio runtime.
    Runtime(String),
    /// Output could not be serialized.
    Output(String),
}

impl CliError {
    /// Print the error and exit with a non-zero status.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Startup(e) => write!(f, "{}", e),
            CliError::Request(e) => match std::error::Error::source(e) {
                Some(source) => write!(f, "{} ({})", e, source),
                None => write!(f, "{}", e),
            },
            CliError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Startup(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Request(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
