//! GeoStudio CLI - Command-line interface
//!
//! Inspects the inputs and cached outputs of the GeoStudio library: raw map
//! API points, filtered point samples, cache keys and configuration.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use geostudio::logging::init_logging;

use commands::cache::CacheAction;
use commands::common::load_config;
use commands::config::ConfigCommands;
use commands::points::{PointsArgs, SampleArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "geostudio", version, about = "Cached cyclability and walkability datasets for cities")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log to stderr only
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the raw map API response for a city
    Points(PointsArgs),

    /// Fetch and filter the points of a city, with their center
    Sample(SampleArgs),

    /// Inspect the artifact cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let (config, config_error) = load_config();

    // Before any runtime exists, so local timestamps resolve.
    let log_file = (!cli.no_log_file).then(|| {
        (
            config.logging.directory.as_path(),
            config.logging.file.as_str(),
        )
    });
    let guard = match init_logging(log_file, cli.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };
    if let Some(e) = config_error {
        if guard.is_some() {
            tracing::warn!(error = %e, "Using default configuration");
        } else {
            eprintln!("Warning: using default configuration: {}", e);
        }
    }

    let result: Result<(), CliError> = match cli.command {
        Commands::Points(args) => commands::points::run_points(args, &config),
        Commands::Sample(args) => commands::points::run_sample(args, &config),
        Commands::Cache { action } => commands::cache::run(action, &config),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        drop(guard);
        e.exit();
    }
}
