//! Service error types.

use thiserror::Error;

use crate::orchestrator::{OrchestratorError, ScoringError};
use crate::points::PointsError;

/// Errors surfaced to callers of the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Source points could not be fetched from the map API.
    #[error("Error fetching and retry points for {city}")]
    PointsUnavailable {
        city: String,
        #[source]
        source: PointsError,
    },

    /// No data could be found or computed for the city.
    #[error("Ville inconnue <br/> Unknown city")]
    UnknownCity {
        city: String,
        #[source]
        source: ScoringError,
    },

    /// The computed document could not be persisted.
    #[error("Failed to store results for {city}")]
    Storage {
        city: String,
        #[source]
        source: OrchestratorError,
    },

    /// The request names an unknown dimension, scope or request core.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServiceError {
    /// HTTP status code for the error, for route layers.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::PointsUnavailable { .. } => 502,
            ServiceError::UnknownCity { .. } => 404,
            ServiceError::Storage { .. } => 500,
            ServiceError::InvalidRequest(_) => 400,
        }
    }

    pub(crate) fn from_orchestrator(city: &str, error: OrchestratorError) -> Self {
        match error {
            OrchestratorError::UnknownCity { city, source } => {
                ServiceError::UnknownCity { city, source }
            }
            OrchestratorError::UnknownScope { .. } | OrchestratorError::NoScorer(_) => {
                ServiceError::InvalidRequest(error.to_string())
            }
            OrchestratorError::Persist { .. } => ServiceError::Storage {
                city: city.to_string(),
                source: error,
            },
        }
    }
}
