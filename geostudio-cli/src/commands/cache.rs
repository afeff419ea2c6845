//! Cache inspection CLI commands.

use clap::Subcommand;
use geostudio::cache::{CacheKey, VersionDirectory};
use geostudio::config::ConfigFile;

use super::common::{block_on, print_json, start_app, DimensionArg};
use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show the storage key of a scope for the current version directory
    Path {
        #[arg(value_enum)]
        dimension: DimensionArg,
        city: String,
        scope: String,
    },
    /// Print a cached scope document
    Get {
        #[arg(value_enum)]
        dimension: DimensionArg,
        city: String,
        scope: String,
    },
    /// Check that the object store answers
    Probe,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    match action {
        CacheAction::Path {
            dimension,
            city,
            scope,
        } => {
            let version = VersionDirectory::current(&config.cache.algorithm_version);
            let key = CacheKey::new(version, city, scope, dimension.into());
            println!("{}", key.path());
            if let Some(dir) = &config.storage.local_dir {
                println!("{}", dir.join(key.path()).display());
            }
            Ok(())
        }
        CacheAction::Get {
            dimension,
            city,
            scope,
        } => {
            let cached = block_on(async {
                let app = start_app(config).await?;
                let cached = app
                    .service()
                    .orchestrator()
                    .cached(dimension.into(), &city, &scope)
                    .await;
                Ok::<_, CliError>(cached)
            })??;
            match cached {
                Some(document) => print_json(&document, true),
                None => {
                    println!("(not cached)");
                    Ok(())
                }
            }
        }
        CacheAction::Probe => {
            let ok = block_on(async {
                let app = start_app(config).await?;
                Ok::<_, CliError>(app.storage_ok())
            })??;
            if ok {
                println!("Storage OK");
                Ok(())
            } else {
                Err(CliError::StorageUnavailable(format!(
                    "could not read {}",
                    config.storage.probe_key
                )))
            }
        }
    }
}
