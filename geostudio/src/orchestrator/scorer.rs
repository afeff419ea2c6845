//! Scoring functions, the opaque computations behind each dimension.

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::points::PointsError;
use crate::BoxFuture;

/// Errors a scorer reports for a city.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The city has no usable data.
    #[error("No data for {city}")]
    NoData { city: String },

    /// Source points could not be fetched.
    #[error(transparent)]
    Points(#[from] PointsError),
}

/// Computes the full result of one dimension for a city.
///
/// Implementations are called at most once at a time per city and
/// dimension. The call is not cancelled and has no timeout.
pub trait Scorer: Send + Sync {
    fn compute<'a>(&'a self, city: &'a str) -> BoxFuture<'a, Result<Value, ScoringError>>;
}

/// Adapts an async closure into a [`Scorer`].
///
/// # Example
///
/// ```ignore
/// let scorer = FnScorer::new(|city: String| async move {
///     Ok(serde_json::json!({ "city": city, "score": 42 }))
/// });
/// ```
pub struct FnScorer<F> {
    f: F,
}

impl<F> FnScorer<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> Scorer for FnScorer<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ScoringError>> + Send + 'static,
{
    fn compute<'a>(&'a self, city: &'a str) -> BoxFuture<'a, Result<Value, ScoringError>> {
        Box::pin((self.f)(city.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_fn_scorer() {
        let scorer = FnScorer::new(|city: String| async move {
            if city == "Atlantis" {
                Err(ScoringError::NoData { city })
            } else {
                Ok(json!({ "city": city }))
            }
        });

        assert_eq!(scorer.compute("Nantes").await.unwrap(), json!({"city": "Nantes"}));
        assert!(matches!(
            scorer.compute("Atlantis").await,
            Err(ScoringError::NoData { .. })
        ));
    }

    #[tokio::test]
    async fn test_points_failure_propagates() {
        let scorer = FnScorer::new(|_city: String| async move {
            let core: crate::points::RequestCore = "bikes".parse()?;
            Ok::<_, ScoringError>(json!({ "core": core.to_string() }))
        });

        let err = scorer.compute("Nantes").await.unwrap_err();
        assert!(matches!(err, ScoringError::Points(PointsError::UnknownRequestCore(_))));
        assert_eq!(err.to_string(), "Unknown request core: bikes");
    }
}
