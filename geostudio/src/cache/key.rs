//! Cache key derivation.
//!
//! Paths follow the layout
//! `"<MM>-<YYYY>/<algorithm version>/<city>.<scope>[.cycling].json"`.
//! The month bucket and the algorithm version together form the version
//! directory: bumping either one makes every older artifact unreachable, so
//! stale results are recomputed rather than served.
//!
//! The city is a single path segment: `%`, `/` and `\` are
//! percent-encoded so that no city name can reach into another directory or
//! alias another city's artifacts.

use std::fmt;

use chrono::{Datelike, Local};

use crate::scope::Dimension;

/// Versioned directory prefix for cache paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionDirectory(String);

impl VersionDirectory {
    /// Builds the directory for a month bucket and algorithm version.
    pub fn new(month: u32, year: i32, algorithm_version: &str) -> Self {
        Self(format!("{:02}-{}/{}", month, year, algorithm_version))
    }

    /// Directory for the given date.
    pub fn for_date<D: Datelike>(date: &D, algorithm_version: &str) -> Self {
        Self::new(date.month(), date.year(), algorithm_version)
    }

    /// Directory for the current local month.
    pub fn current(algorithm_version: &str) -> Self {
        Self::for_date(&Local::now(), algorithm_version)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one cached scope of one city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    version: VersionDirectory,
    city: String,
    scope: String,
    dimension: Dimension,
}

impl CacheKey {
    pub fn new(
        version: VersionDirectory,
        city: impl Into<String>,
        scope: impl Into<String>,
        dimension: Dimension,
    ) -> Self {
        Self {
            version,
            city: city.into(),
            scope: scope.into(),
            dimension,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn version(&self) -> &VersionDirectory {
        &self.version
    }

    /// Relative storage path, shared by the object store and the local mirror.
    pub fn path(&self) -> String {
        let city = encode_segment(&self.city);
        match self.dimension.cache_suffix() {
            Some(suffix) => format!("{}/{}.{}.{}.json", self.version, city, self.scope, suffix),
            None => format!("{}/{}.{}.json", self.version, city, self.scope),
        }
    }
}

/// Escapes the characters that would split or alias a path segment.
fn encode_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            '/' => encoded.push_str("%2F"),
            '\\' => encoded.push_str("%5C"),
            c => encoded.push(c),
        }
    }
    encoded
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_version_directory_pads_month() {
        assert_eq!(VersionDirectory::new(3, 2026, "v7").as_str(), "03-2026/v7");
        assert_eq!(VersionDirectory::new(11, 2025, "v7").as_str(), "11-2025/v7");
    }

    #[test]
    fn test_version_directory_for_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            VersionDirectory::for_date(&date, "2").to_string(),
            "10-2026/2"
        );
    }

    #[test]
    fn test_cycling_path_has_suffix() {
        let key = CacheKey::new(
            VersionDirectory::new(10, 2026, "v1"),
            "Nantes",
            "cycling-score",
            Dimension::Cycling,
        );
        assert_eq!(key.path(), "10-2026/v1/Nantes.cycling-score.cycling.json");
    }

    #[test]
    fn test_walking_path_has_no_suffix() {
        let key = CacheKey::new(
            VersionDirectory::new(10, 2026, "v1"),
            "Nantes",
            "meta",
            Dimension::Walking,
        );
        assert_eq!(key.path(), "10-2026/v1/Nantes.meta.json");
        assert_eq!(key.to_string(), key.path());
    }

    #[test]
    fn test_city_cannot_escape_its_segment() {
        let version = VersionDirectory::new(10, 2026, "1");
        let nantes = CacheKey::new(version.clone(), "Nantes", "full", Dimension::Cycling);
        let dotted = CacheKey::new(version.clone(), "../Nantes", "full", Dimension::Cycling);

        assert_eq!(dotted.path(), "10-2026/1/..%2FNantes.full.cycling.json");
        assert_ne!(dotted.path(), nantes.path());
        assert_eq!(dotted.path().matches('/').count(), 2);
    }

    #[test]
    fn test_city_encoding_is_unambiguous() {
        let version = VersionDirectory::new(10, 2026, "1");
        let slash = CacheKey::new(version.clone(), "a/b", "meta", Dimension::Walking);
        let literal = CacheKey::new(version.clone(), "a%2Fb", "meta", Dimension::Walking);
        let backslash = CacheKey::new(version, "a\\b", "meta", Dimension::Walking);

        assert_eq!(slash.path(), "10-2026/1/a%2Fb.meta.json");
        assert_eq!(literal.path(), "10-2026/1/a%252Fb.meta.json");
        assert_eq!(backslash.path(), "10-2026/1/a%5Cb.meta.json");
    }

    #[test]
    fn test_plain_city_names_are_unchanged() {
        let key = CacheKey::new(
            VersionDirectory::new(10, 2026, "1"),
            "Saint-Malo",
            "meta",
            Dimension::Walking,
        );
        assert_eq!(key.path(), "10-2026/1/Saint-Malo.meta.json");
    }

    #[test]
    fn test_version_bump_changes_path() {
        let old = CacheKey::new(
            VersionDirectory::new(10, 2026, "v1"),
            "Lyon",
            "meta",
            Dimension::Walking,
        );
        let new = CacheKey::new(
            VersionDirectory::new(10, 2026, "v2"),
            "Lyon",
            "meta",
            Dimension::Walking,
        );
        assert_ne!(old.path(), new.path());
    }
}
