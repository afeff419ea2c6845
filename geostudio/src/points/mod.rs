//! Source points for the cycling and walking metrics.
//!
//! Points come from the Overpass API: town halls (one per commune, reduced
//! to a single coordinate) and a random sample of public transport stops.
//! Place-name queries can match homonyms abroad ("Paris" also exists in
//! Texas), so results are filtered against metropolitan France unless the
//! city was given as an unambiguous numeric id.

mod cluster;
mod overpass;
mod source;

use thiserror::Error;

pub use cluster::cluster_townhalls;
pub use overpass::{
    build_query, query_url, ElementType, Member, OverpassElement, OverpassResponse, RequestCore,
    DEFAULT_ADMIN_LEVEL, DEFAULT_OVERPASS_URL, OVERPASS_AREA_OFFSET,
};
pub use source::{PointSource, RESPONSE_TTL};

use crate::fetch::FetchError;
use crate::geo::{is_numeric_id, BoundingBox, Point, Region};

/// Default number of transit stops kept per city.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Errors that can occur while retrieving points.
#[derive(Debug, Error)]
pub enum PointsError {
    /// Aggregating the points of a city failed.
    #[error("Failed to download points for {city}: {source}")]
    Download {
        city: String,
        #[source]
        source: Box<PointsError>,
    },

    /// The request core is neither `townhalls` nor `stops`.
    #[error("Unknown request core: {0}")]
    UnknownRequestCore(String),

    /// The map API endpoint is not a valid URL.
    #[error("Invalid map API endpoint: {0}")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Keeps the points of `city` that lie inside `region`.
///
/// Numeric city ids are returned unfiltered.
pub fn filter_to_region(points: Vec<Point>, city: &str, region: &Region) -> Vec<Point> {
    if is_numeric_id(city) {
        return points;
    }
    points
        .into_iter()
        .filter(|p| region.contains(p.lon, p.lat))
        .collect()
}

/// Center of the bounding box of `points`, as a map-view anchor.
///
/// Returns `None` for an empty set.
pub fn compute_center(points: &[Point]) -> Option<Point> {
    let (lat, lon) = BoundingBox::from_points(points)?.center();
    Some(Point::new(0, lat, lon))
}
