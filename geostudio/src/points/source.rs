//! Point retrieval from the Overpass API.

use std::time::Duration;

use moka::future::Cache;
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{debug, info};

use super::cluster::cluster_townhalls;
use super::overpass::{
    query_url, OverpassResponse, RequestCore, DEFAULT_ADMIN_LEVEL, DEFAULT_OVERPASS_URL,
};
use super::{filter_to_region, PointsError};
use crate::fetch::{FetchError, HttpClient, RetryFetcher};
use crate::geo::{metropolitan_france, Point, Region};

/// How long proxied responses are served from memory.
pub const RESPONSE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of memoized responses.
const MAX_CACHED_RESPONSES: u64 = 1_000;

/// Fetches, reduces and filters map-data points for cities.
///
/// Successful raw responses are memoized for [`RESPONSE_TTL`], keyed by
/// city, request core and admin level. Failed requests are not memoized.
pub struct PointSource<C: HttpClient> {
    fetcher: RetryFetcher<C>,
    endpoint: String,
    admin_level: u8,
    region: Region,
    responses: Cache<(String, RequestCore, u8), Value>,
}

impl<C: HttpClient> PointSource<C> {
    /// Creates a source querying the public Overpass endpoint and filtering
    /// against metropolitan France.
    pub fn new(fetcher: RetryFetcher<C>) -> Self {
        Self {
            fetcher,
            endpoint: DEFAULT_OVERPASS_URL.to_string(),
            admin_level: DEFAULT_ADMIN_LEVEL,
            region: metropolitan_france(),
            responses: Cache::builder()
                .max_capacity(MAX_CACHED_RESPONSES)
                .time_to_live(RESPONSE_TTL)
                .build(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the admin level used when a request does not name one.
    pub fn with_admin_level(mut self, admin_level: u8) -> Self {
        self.admin_level = admin_level;
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Returns the map API's JSON for `core` inside `city`, verbatim.
    ///
    /// # Errors
    ///
    /// `PointsError::Fetch` once every attempt has failed or the body is not
    /// JSON.
    pub async fn raw(
        &self,
        city: &str,
        core: RequestCore,
        admin_level: Option<u8>,
    ) -> Result<Value, PointsError> {
        let admin_level = admin_level.unwrap_or(self.admin_level);
        let key = (city.to_string(), core, admin_level);

        if let Some(cached) = self.responses.get(&key).await {
            debug!(city, core = %core, "Serving memoized points response");
            return Ok(cached);
        }

        let url = query_url(&self.endpoint, city, core, admin_level)?;
        info!(city, core = %core, admin_level, "Fetching points from map API");
        let response: Value = self.fetcher.fetch_json(url.as_str()).await?;

        self.responses.insert(key, response.clone()).await;
        Ok(response)
    }

    async fn elements(&self, city: &str, core: RequestCore) -> Result<OverpassResponse, PointsError> {
        let raw = self.raw(city, core, None).await?;
        serde_json::from_value(raw)
            .map_err(|e| PointsError::Fetch(FetchError::Decode(e.to_string())))
    }

    /// One point per town hall of `city`.
    pub async fn fetch_townhalls(&self, city: &str) -> Result<Vec<Point>, PointsError> {
        let response = self.elements(city, RequestCore::Townhalls).await?;
        Ok(cluster_townhalls(&response.elements))
    }

    /// A uniform random sample of at most `sample_size` transit stops.
    pub async fn fetch_transit_stops(
        &self,
        city: &str,
        sample_size: usize,
    ) -> Result<Vec<Point>, PointsError> {
        let response = self.elements(city, RequestCore::Stops).await?;
        let mut stops: Vec<Point> = response
            .elements
            .iter()
            .filter_map(|element| element.to_point())
            .collect();

        let total = stops.len();
        stops.shuffle(&mut rand::rng());
        stops.truncate(sample_size);
        debug!(city, total, kept = stops.len(), "Sampled transit stops");
        Ok(stops)
    }

    /// Town halls followed by sampled transit stops.
    ///
    /// # Errors
    ///
    /// `PointsError::Download` wrapping the first failure.
    pub async fn fetch_all(&self, city: &str, sample_size: usize) -> Result<Vec<Point>, PointsError> {
        let download = |source: PointsError| PointsError::Download {
            city: city.to_string(),
            source: Box::new(source),
        };

        let mut points = self.fetch_townhalls(city).await.map_err(download)?;
        let stops = self
            .fetch_transit_stops(city, sample_size)
            .await
            .map_err(download)?;
        points.extend(stops);
        Ok(points)
    }

    /// Fetches every point of `city` and drops those outside the region.
    pub async fn process(&self, city: &str, sample_size: usize) -> Result<Vec<Point>, PointsError> {
        let fetched = self.fetch_all(city, sample_size).await?;
        let fetched_count = fetched.len();
        let points = filter_to_region(fetched, city, &self.region);
        info!(
            city,
            fetched = fetched_count,
            kept = points.len(),
            "Points processed"
        );
        Ok(points)
    }
}
