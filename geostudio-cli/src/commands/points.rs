//! Point retrieval commands.

use clap::{Args, ValueEnum};
use geostudio::config::ConfigFile;

use super::common::{block_on, print_json, start_app};
use crate::error::CliError;

/// Kind of points to request.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CoreArg {
    /// Town halls
    Townhalls,
    /// Public transport stops
    Stops,
}

impl CoreArg {
    fn as_str(&self) -> &'static str {
        match self {
            CoreArg::Townhalls => "townhalls",
            CoreArg::Stops => "stops",
        }
    }
}

/// Arguments of `points`.
#[derive(Debug, Args)]
pub struct PointsArgs {
    /// City name or numeric OpenStreetMap relation id
    pub city: String,

    /// Kind of points
    #[arg(value_enum)]
    pub core: CoreArg,

    /// Administrative level for place-name queries
    #[arg(long)]
    pub admin_level: Option<u8>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments of `sample`.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// City name or numeric OpenStreetMap relation id
    pub city: String,

    /// Number of transit stops to keep
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Print the points as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Print the raw map API response for a city.
pub fn run_points(args: PointsArgs, config: &ConfigFile) -> Result<(), CliError> {
    let value = block_on(async {
        let app = start_app(config).await?;
        let value = app
            .service()
            .points(&args.city, args.core.as_str(), args.admin_level)
            .await?;
        Ok::<_, CliError>(value)
    })??;
    print_json(&value, args.pretty)
}

/// Fetch, filter and summarize the points of a city.
pub fn run_sample(args: SampleArgs, config: &ConfigFile) -> Result<(), CliError> {
    let sample = block_on(async {
        let app = start_app(config).await?;
        let sample = app.service().sample(&args.city, args.sample_size).await?;
        Ok::<_, CliError>(sample)
    })??;

    if args.json {
        return print_json(&serde_json::to_value(&sample)?, true);
    }

    let townhalls = sample
        .points
        .iter()
        .filter(|p| p.tags.get("amenity").map(String::as_str) == Some("townhall"))
        .count();
    println!("{}: {} points", args.city, sample.points.len());
    println!("  Town halls:    {}", townhalls);
    println!("  Transit stops: {}", sample.points.len() - townhalls);
    match sample.center {
        Some(center) => println!("  Center:        {:.5}, {:.5}", center.lat, center.lon),
        None => println!("  Center:        (no points)"),
    }
    Ok(())
}
