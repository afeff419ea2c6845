//! Containment regions.
//!
//! A [`Region`] is a polygon of `(lon, lat)` vertices. The ring is closed
//! automatically before evaluation, so callers may omit the repeated first
//! vertex.

/// A closed polygon used as a containment filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    vertices: Vec<(f64, f64)>,
}

impl Region {
    /// Creates a region from `(lon, lat)` vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self { vertices }
    }

    /// Returns the vertices as given.
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Returns the ring with its first vertex repeated at the end.
    ///
    /// Already-closed rings are returned unchanged.
    pub fn closed(&self) -> Vec<(f64, f64)> {
        let mut ring = self.vertices.clone();
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }
        ring
    }

    /// Returns true if `(lon, lat)` lies inside the polygon.
    ///
    /// Uses even-odd ray casting. Degenerate rings (fewer than three distinct
    /// vertices) contain nothing.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let ring = self.closed();
        if ring.len() < 4 {
            return false;
        }

        let mut inside = false;
        for edge in ring.windows(2) {
            let (x1, y1) = edge[0];
            let (x2, y2) = edge[1];
            if (y1 > lat) != (y2 > lat) {
                let crossing = x1 + (lat - y1) * (x2 - x1) / (y2 - y1);
                if lon < crossing {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Coarse outline of metropolitan France.
///
/// Place-name queries such as "Paris" also match places in other countries,
/// so results are clipped to this pentagon. Corsica and overseas territories
/// fall outside of it.
pub fn metropolitan_france() -> Region {
    Region::new(vec![
        (-5.353852828534542, 48.42923941831151),
        (2.5964340170922924, 51.97021507483498),
        (8.734619911467632, 49.03027507341659),
        (10.345413967223578, 41.03091304244174),
        (-2.447427130244762, 42.92290589918966),
    ])
}
