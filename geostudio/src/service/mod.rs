//! Inbound request surface.
//!
//! `GeoStudioService` is what a route layer calls: it parses the raw request
//! segments, delegates to the [`Orchestrator`] or the [`PointSource`], and
//! maps failures to the errors end users see.

mod error;

pub use error::ServiceError;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::fetch::HttpClient;
use crate::geo::Point;
use crate::orchestrator::Orchestrator;
use crate::points::{compute_center, PointSource, RequestCore, DEFAULT_SAMPLE_SIZE};
use crate::scope::Dimension;

/// Processed points of a city with their map-view anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSample {
    pub points: Vec<Point>,
    pub center: Option<Point>,
}

/// Request-level facade over orchestration and point retrieval.
pub struct GeoStudioService<C: HttpClient> {
    orchestrator: Arc<Orchestrator>,
    points: Arc<PointSource<C>>,
    sample_size: usize,
}

impl<C: HttpClient> GeoStudioService<C> {
    pub fn new(orchestrator: Arc<Orchestrator>, points: Arc<PointSource<C>>) -> Self {
        Self {
            orchestrator,
            points,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Sets the default number of transit stops kept per city.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    pub fn point_source(&self) -> &Arc<PointSource<C>> {
        &self.points
    }

    /// Returns the `scope` document of `dimension` for `city`.
    ///
    /// # Errors
    ///
    /// * `InvalidRequest` - unknown dimension or scope
    /// * `UnknownCity` - no data could be computed for the city
    /// * `Storage` - the document was computed but not persisted
    pub async fn scope(&self, dimension: &str, scope: &str, city: &str) -> Result<Value, ServiceError> {
        let dimension: Dimension = dimension
            .parse()
            .map_err(|e: crate::scope::ScopeError| ServiceError::InvalidRequest(e.to_string()))?;

        info!(dimension = %dimension, city, scope, "API request");
        self.orchestrator
            .request(dimension, scope, city)
            .await
            .map_err(|e| ServiceError::from_orchestrator(city, e))
    }

    /// Proxies a raw points query to the map API and returns its JSON.
    pub async fn points(
        &self,
        city: &str,
        request_core: &str,
        admin_level: Option<u8>,
    ) -> Result<Value, ServiceError> {
        let core: RequestCore = request_core
            .parse()
            .map_err(|e: crate::points::PointsError| ServiceError::InvalidRequest(e.to_string()))?;

        debug!(city, core = %core, ?admin_level, "Points request");
        self.points
            .raw(city, core, admin_level)
            .await
            .map_err(|source| ServiceError::PointsUnavailable {
                city: city.to_string(),
                source,
            })
    }

    /// Fetches and filters the points of `city`, with their center.
    ///
    /// `sample_size` defaults to the service's configured size.
    pub async fn sample(&self, city: &str, sample_size: Option<usize>) -> Result<PointSample, ServiceError> {
        let sample_size = sample_size.unwrap_or(self.sample_size);
        let points = self
            .points
            .process(city, sample_size)
            .await
            .map_err(|source| ServiceError::PointsUnavailable {
                city: city.to_string(),
                source,
            })?;
        let center = compute_center(&points);
        Ok(PointSample { points, center })
    }
}
