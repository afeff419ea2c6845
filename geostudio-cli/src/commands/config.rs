//! `geostudio config`: read and edit `~/.geostudio/config.ini`.
//!
//! Settings are addressed by their dotted name, `<section>.<key>`, the same
//! way they are grouped in the file.

use std::path::Path;

use clap::Subcommand;
use geostudio::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Width of the name column in `config list`.
const NAME_WIDTH: usize = 26;

/// Marker printed for settings with no value.
const UNSET: &str = "-";

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of one setting
    Get {
        /// Dotted setting name, such as cache.algorithm_version
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Dotted setting name, such as storage.endpoint
        key: String,

        /// New value; an empty string clears optional settings
        value: String,
    },

    /// Print every setting, flagging the ones that differ from the defaults
    List,

    /// Print where the configuration file lives
    Path,

    /// Create the configuration file filled with defaults
    Init {
        /// Replace the file if it already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Get { key } => {
            println!("{}", show_value(&lookup(&key)?.get(&ConfigFile::load_from(&path)?)));
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let change = update(&path, lookup(&key)?, &value)?;
            println!("{}", change);
            Ok(())
        }
        ConfigCommands::List => {
            println!("# {}", path.display());
            for line in listing(&ConfigFile::load_from(&path)?) {
                println!("{}", line);
            }
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            initialize(&path, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn lookup(name: &str) -> Result<ConfigKey, CliError> {
    name.parse().map_err(|_| {
        let known: Vec<String> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!("no setting named '{}' (known: {})", name, known.join(", ")))
    })
}

fn show_value(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}

/// One `config list` line: name, value and the default when it differs.
fn format_entry(key: ConfigKey, config: &ConfigFile, defaults: &ConfigFile) -> String {
    let value = key.get(config);
    let default = key.get(defaults);
    let line = format!("{:<width$} {}", key.name(), show_value(&value), width = NAME_WIDTH);
    if value == default {
        line
    } else {
        format!("{}  (default: {})", line, show_value(&default))
    }
}

fn listing(config: &ConfigFile) -> Vec<String> {
    let defaults = ConfigFile::default();
    ConfigKey::all()
        .iter()
        .map(|key| format_entry(*key, config, &defaults))
        .collect()
}

/// Applies `value` to `key` in the file at `path`, returning a summary of the change.
fn update(path: &Path, key: ConfigKey, value: &str) -> Result<String, CliError> {
    let mut config = ConfigFile::load_from(path)?;
    let before = key.get(&config);
    key.set(&mut config, value)?;
    config.save_to(path)?;
    let after = key.get(&config);
    Ok(format!("{}: {} -> {}", key.name(), show_value(&before), show_value(&after)))
}

fn initialize(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists, pass --force to replace it",
            path.display()
        )));
    }
    ConfigFile::default().save_to(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_entry_has_no_marker() {
        let defaults = ConfigFile::default();
        let line = format_entry(ConfigKey::StorageBucket, &defaults, &defaults);
        assert!(line.starts_with("storage.bucket "));
        assert!(!line.contains("default:"));
    }

    #[test]
    fn test_changed_entry_shows_default() {
        let defaults = ConfigFile::default();
        let mut config = defaults.clone();
        config.points.sample_size = 25;

        let line = format_entry(ConfigKey::PointsSampleSize, &config, &defaults);
        assert_eq!(
            line,
            format!(
                "{:<26} 25  (default: {})",
                "points.sample_size", defaults.points.sample_size
            )
        );
    }

    #[test]
    fn test_unset_entry_uses_marker() {
        let defaults = ConfigFile::default();
        let line = format_entry(ConfigKey::StorageEndpoint, &defaults, &defaults);
        assert_eq!(line, format!("{:<26} -", "storage.endpoint"));
    }

    #[test]
    fn test_listing_covers_every_key() {
        let lines = listing(&ConfigFile::default());
        assert_eq!(lines.len(), ConfigKey::all().len());
        assert!(lines[0].starts_with("overpass.url"));
    }

    #[test]
    fn test_update_reports_and_saves() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        let summary = update(&path, ConfigKey::CacheAlgorithmVersion, "7").unwrap();
        let default = ConfigFile::default().cache.algorithm_version;
        assert_eq!(summary, format!("cache.algorithm_version: {} -> 7", default));
        assert_eq!(ConfigFile::load_from(&path).unwrap().cache.algorithm_version, "7");
    }

    #[test]
    fn test_update_rejects_invalid_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        assert!(update(&path, ConfigKey::PointsSampleSize, "many").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_initialize_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        initialize(&path, false).unwrap();
        assert!(matches!(initialize(&path, false), Err(CliError::Config(_))));
        initialize(&path, true).unwrap();
    }

    #[test]
    fn test_unknown_setting() {
        let err = lookup("storage.nope").unwrap_err();
        assert!(err.to_string().contains("storage.nope"));
        assert!(err.to_string().contains("cache.enabled"));
    }
}
