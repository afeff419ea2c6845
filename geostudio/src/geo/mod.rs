//! Geographic primitives
//!
//! Points, bounding boxes and containment regions used to clean up the
//! results returned by the map-data API before they are scored.

mod region;
mod types;

pub use region::{metropolitan_france, Region};
pub use types::{BoundingBox, Point};

/// Returns true if `city` is a numeric OpenStreetMap identifier.
///
/// Numeric identifiers designate a single relation and are therefore
/// unambiguous, unlike place names which can match several countries.
pub fn is_numeric_id(city: &str) -> bool {
    !city.is_empty() && city.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id() {
        assert!(is_numeric_id("12345"));
        assert!(is_numeric_id("0"));
    }

    #[test]
    fn test_names_are_not_numeric() {
        assert!(!is_numeric_id("Nantes"));
        assert!(!is_numeric_id("75056a"));
        assert!(!is_numeric_id("-12"));
        assert!(!is_numeric_id(""));
    }
}
