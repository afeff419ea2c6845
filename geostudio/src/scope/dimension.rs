//! Metric dimensions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScopeError;

/// Top-level metric family computed for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Cycling,
    Walking,
}

impl Dimension {
    /// All dimensions, in a stable order.
    pub const ALL: [Dimension; 2] = [Dimension::Cycling, Dimension::Walking];

    /// Lowercase name used in routes, lock keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Cycling => "cycling",
            Dimension::Walking => "walking",
        }
    }

    /// Suffix inserted before `.json` in cache file names.
    ///
    /// Walking artifacts predate the cycling dimension and carry no suffix.
    pub fn cache_suffix(&self) -> Option<&'static str> {
        match self {
            Dimension::Cycling => Some("cycling"),
            Dimension::Walking => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cycling" => Ok(Dimension::Cycling),
            "walking" => Ok(Dimension::Walking),
            other => Err(ScopeError::UnknownDimension(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for dimension in Dimension::ALL {
            assert_eq!(dimension.as_str().parse::<Dimension>().unwrap(), dimension);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "driving".parse::<Dimension>().unwrap_err();
        assert!(matches!(err, ScopeError::UnknownDimension(ref d) if d == "driving"));
    }

    #[test]
    fn test_cache_suffix() {
        assert_eq!(Dimension::Cycling.cache_suffix(), Some("cycling"));
        assert_eq!(Dimension::Walking.cache_suffix(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Dimension::Walking).unwrap(),
            "\"walking\""
        );
    }
}
