//! Orchestrator types and errors

use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::scorer::ScoringError;
use crate::cache::CacheError;
use crate::scope::Dimension;

/// Errors that can occur while serving a scope request.
#[derive(Debug)]
pub enum OrchestratorError {
    /// The scope is not registered under the dimension.
    UnknownScope { dimension: Dimension, scope: String },
    /// No scorer is registered for the dimension.
    NoScorer(Dimension),
    /// The scorer could not produce a result for the city.
    UnknownCity { city: String, source: ScoringError },
    /// The requested scope was computed but could not be persisted.
    Persist { scope: String, source: CacheError },
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestratorError::UnknownScope { dimension, scope } => {
                write!(f, "Unknown scope '{}' for dimension {}", scope, dimension)
            }
            OrchestratorError::NoScorer(dimension) => {
                write!(f, "No scorer registered for dimension {}", dimension)
            }
            OrchestratorError::UnknownCity { city, source } => {
                write!(f, "Could not compute data for {}: {}", city, source)
            }
            OrchestratorError::Persist { scope, source } => {
                write!(f, "Failed to persist scope '{}': {}", scope, source)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrchestratorError::UnknownCity { source, .. } => Some(source),
            OrchestratorError::Persist { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Lifecycle of one scope request.
///
/// ```text
/// CacheCheck ──► HitReturn
///     │
///     ├──► LockWait ──► HitReturn
///     │        │
///     ▼        ▼
///   Computing ──► Fanout ──► Done
///     │             │
///     └──► Failed ◄─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    CacheCheck,
    HitReturn,
    LockWait,
    Computing,
    Fanout,
    Done,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::HitReturn | JobState::Done | JobState::Failed)
    }

    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (CacheCheck, HitReturn)
                | (CacheCheck, LockWait)
                | (CacheCheck, Computing)
                | (CacheCheck, Failed)
                | (LockWait, HitReturn)
                | (LockWait, Computing)
                | (Computing, Fanout)
                | (Computing, Failed)
                | (Fanout, Done)
                | (Fanout, Failed)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One scope request travelling through the orchestrator.
///
/// Owned by the request that created it and never shared.
#[derive(Debug)]
pub struct ComputationJob {
    dimension: Dimension,
    city: String,
    requested_scope: String,
    state: JobState,
}

impl ComputationJob {
    pub fn new(dimension: Dimension, city: impl Into<String>, requested_scope: impl Into<String>) -> Self {
        Self {
            dimension,
            city: city.into(),
            requested_scope: requested_scope.into(),
            state: JobState::CacheCheck,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn requested_scope(&self) -> &str {
        &self.requested_scope
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub(crate) fn transition(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid job transition {} -> {}",
            self.state,
            next
        );
        debug!(
            city = %self.city,
            dimension = %self.dimension,
            scope = %self.requested_scope,
            from = %self.state,
            to = %next,
            "Job state"
        );
        self.state = next;
    }
}

/// Result of persisting one scope.
#[derive(Debug)]
pub struct ScopeOutcome {
    pub scope: String,
    pub artifact: Value,
    pub result: Result<(), CacheError>,
}

impl ScopeOutcome {
    pub fn is_written(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-scope results of one fan-out, in registration order.
#[derive(Debug, Default)]
pub struct FanoutReport {
    outcomes: Vec<ScopeOutcome>,
}

impl FanoutReport {
    pub fn new(outcomes: Vec<ScopeOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ScopeOutcome] {
        &self.outcomes
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    /// Removes and returns the outcome for `scope`.
    pub fn take(&mut self, scope: &str) -> Option<ScopeOutcome> {
        let index = self.outcomes.iter().position(|o| o.scope == scope)?;
        Some(self.outcomes.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoreError;

    #[test]
    fn test_terminal_states() {
        assert!(JobState::HitReturn.is_terminal());
        assert!(JobState::Done.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::CacheCheck.is_terminal());
        assert!(!JobState::LockWait.is_terminal());
        assert!(!JobState::Computing.is_terminal());
        assert!(!JobState::Fanout.is_terminal());
    }

    #[test]
    fn test_terminal_states_have_no_successors() {
        use JobState::*;
        let all = [CacheCheck, HitReturn, LockWait, Computing, Fanout, Done, Failed];
        for from in all.iter().filter(|s| s.is_terminal()) {
            for to in all {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_cold_path_transitions() {
        let mut job = ComputationJob::new(Dimension::Cycling, "Nantes", "cycling-score");
        assert_eq!(job.state(), JobState::CacheCheck);
        job.transition(JobState::LockWait);
        job.transition(JobState::Computing);
        job.transition(JobState::Fanout);
        job.transition(JobState::Done);
        assert!(job.state().is_terminal());
    }

    #[test]
    fn test_lock_wait_cannot_fail_directly() {
        assert!(!JobState::LockWait.can_transition_to(JobState::Failed));
        assert!(!JobState::CacheCheck.can_transition_to(JobState::Fanout));
    }

    #[test]
    fn test_fanout_report_counts() {
        let mut report = FanoutReport::new(vec![
            ScopeOutcome {
                scope: "a".to_string(),
                artifact: Value::Null,
                result: Ok(()),
            },
            ScopeOutcome {
                scope: "b".to_string(),
                artifact: Value::Null,
                result: Err(CacheError::Persist {
                    path: "b".to_string(),
                    source: StoreError::Provider("down".to_string()),
                }),
            },
        ]);
        assert_eq!(report.written(), 1);
        assert_eq!(report.failed(), 1);

        let b = report.take("b").unwrap();
        assert!(!b.is_written());
        assert!(report.take("b").is_none());
        assert_eq!(report.outcomes().len(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::UnknownScope {
            dimension: Dimension::Walking,
            scope: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown scope 'nope' for dimension walking");
    }
}
