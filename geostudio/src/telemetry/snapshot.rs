//! Point-in-time telemetry.

use std::fmt;

/// Copy of the request counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub lock_waits: u64,
    pub computations_started: u64,
    pub computations_failed: u64,
    pub scopes_written: u64,
    pub scope_writes_failed: u64,
}

impl TelemetrySnapshot {
    /// Requests that passed scope validation: each ends as a hit or a miss.
    pub fn requests(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }

    /// Fraction of requests served from cache, 0.0 when idle.
    pub fn hit_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            total => self.cache_hits as f64 / total as f64,
        }
    }
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests ({} hits, {} misses), {} computations ({} failed), {} scopes written ({} failed)",
            self.requests(),
            self.cache_hits,
            self.cache_misses,
            self.computations_started,
            self.computations_failed,
            self.scopes_written,
            self.scope_writes_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_idle() {
        assert_eq!(TelemetrySnapshot::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let snapshot = TelemetrySnapshot {
            cache_hits: 3,
            cache_misses: 1,
            ..Default::default()
        };
        assert_eq!(snapshot.requests(), 4);
        assert!((snapshot.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        let snapshot = TelemetrySnapshot {
            cache_hits: 1,
            cache_misses: 2,
            computations_started: 2,
            scopes_written: 8,
            ..Default::default()
        };
        let text = snapshot.to_string();
        assert!(text.contains("3 requests"));
        assert!(text.contains("8 scopes written"));
    }
}
