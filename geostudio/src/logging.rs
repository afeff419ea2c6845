//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing to stderr and, optionally,
//! to a log file through a non-blocking writer. The filter honours
//! `RUST_LOG` and defaults to `geostudio=info`.
//!
//! Local timestamps need the UTC offset, which can only be determined
//! reliably before worker threads start: call [`init_logging`] before
//! building the Tokio runtime.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]";

/// Keeps the file writer alive; pending lines are flushed on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "geostudio=debug,geostudio_cli=debug"
    } else {
        "geostudio=info,geostudio_cli=info"
    }
}

/// Installs the global subscriber.
///
/// # Arguments
///
/// * `log_file` - Directory and file name of the log file, `None` for
///   stderr only
/// * `verbose` - Lower the default level to debug
///
/// # Errors
///
/// Fails if the log directory cannot be created or a subscriber is already
/// installed.
pub fn init_logging(log_file: Option<(&Path, &str)>, verbose: bool) -> io::Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let format = time::format_description::parse(TIME_FORMAT).map_err(io::Error::other)?;
    let timer = LocalTime::new(format);

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer.clone())
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some((directory, file_name)) => {
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_timer(timer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_format_parses() {
        assert!(time::format_description::parse(TIME_FORMAT).is_ok());
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "geostudio=info,geostudio_cli=info");
        assert!(default_directive(true).contains("geostudio=debug"));
    }
}
