//! Reduction of multi-geometry landmarks to single points.
//!
//! Town halls are mapped as nodes, as building outlines (ways) or as
//! multipolygon relations. Scoring needs one coordinate per town hall, so
//! ways resolve to their first node and relations to the first node of their
//! first member.

use std::collections::HashMap;

use tracing::warn;

use super::overpass::{ElementType, OverpassElement};
use crate::geo::Point;

/// Id lookup over one response, first occurrence wins.
struct ElementIndex<'a> {
    by_id: HashMap<i64, &'a OverpassElement>,
    by_kind: HashMap<(ElementType, i64), &'a OverpassElement>,
}

impl<'a> ElementIndex<'a> {
    fn new(elements: &'a [OverpassElement]) -> Self {
        let mut by_id = HashMap::with_capacity(elements.len());
        let mut by_kind = HashMap::with_capacity(elements.len());
        for element in elements {
            by_id.entry(element.id).or_insert(element);
            by_kind.entry((element.kind, element.id)).or_insert(element);
        }
        Self { by_id, by_kind }
    }

    fn get(&self, kind: Option<ElementType>, id: i64) -> Option<&'a OverpassElement> {
        match kind {
            Some(kind) => self.by_kind.get(&(kind, id)).copied(),
            None => self.by_id.get(&id).copied(),
        }
    }

    /// Coordinate of the first node of `way`.
    fn first_node_coordinate(&self, way: &OverpassElement) -> Option<(f64, f64)> {
        let first = *way.nodes.first()?;
        self.get(Some(ElementType::Node), first)
            .or_else(|| self.get(None, first))?
            .coordinate()
    }

    fn resolve(&self, element: &OverpassElement) -> Option<(f64, f64)> {
        match element.kind {
            ElementType::Way => self.first_node_coordinate(element),
            ElementType::Relation => {
                let member = element.members.first()?;
                let referenced = self.get(member.kind, member.reference)?;
                referenced
                    .coordinate()
                    .or_else(|| self.first_node_coordinate(referenced))
            }
            ElementType::Node | ElementType::Other => element.coordinate(),
        }
    }
}

/// Extracts one point per town hall from an Overpass response.
///
/// Elements not tagged `amenity=townhall` are dropped. Ways take the
/// coordinate of their first node, relations the first node of their first
/// member. Town halls whose references are missing from the response are
/// skipped.
pub fn cluster_townhalls(elements: &[OverpassElement]) -> Vec<Point> {
    let index = ElementIndex::new(elements);

    elements
        .iter()
        .filter(|e| e.tag("amenity") == Some("townhall"))
        .filter_map(|element| match index.resolve(element) {
            Some((lat, lon)) => Some(Point {
                id: element.id,
                lat,
                lon,
                tags: element.tags.clone(),
            }),
            None => {
                warn!(id = element.id, kind = ?element.kind, "Unresolvable townhall geometry, skipping");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::points::overpass::Member;

    fn element(kind: ElementType, id: i64) -> OverpassElement {
        OverpassElement {
            id,
            kind,
            tags: BTreeMap::new(),
            lat: None,
            lon: None,
            nodes: Vec::new(),
            members: Vec::new(),
        }
    }

    fn node(id: i64, lat: f64, lon: f64) -> OverpassElement {
        OverpassElement {
            lat: Some(lat),
            lon: Some(lon),
            ..element(ElementType::Node, id)
        }
    }

    fn townhall(mut e: OverpassElement) -> OverpassElement {
        e.tags.insert("amenity".to_string(), "townhall".to_string());
        e
    }

    #[test]
    fn test_way_resolves_to_first_node() {
        let elements = vec![
            townhall(OverpassElement {
                nodes: vec![1, 2],
                ..element(ElementType::Way, 100)
            }),
            node(1, 10.0, 20.0),
            node(2, 30.0, 40.0),
        ];

        let points = cluster_townhalls(&elements);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, 100);
        assert_eq!((points[0].lat, points[0].lon), (10.0, 20.0));
        assert_eq!(points[0].tags.get("amenity").map(String::as_str), Some("townhall"));
    }

    #[test]
    fn test_relation_resolves_through_member_way() {
        let elements = vec![
            townhall(OverpassElement {
                members: vec![Member {
                    kind: None,
                    reference: 5,
                    role: String::new(),
                }],
                ..element(ElementType::Relation, 200)
            }),
            OverpassElement {
                nodes: vec![7, 8],
                ..element(ElementType::Way, 5)
            },
            node(7, 1.0, 2.0),
            node(8, 3.0, 4.0),
        ];

        let points = cluster_townhalls(&elements);
        assert_eq!(points.len(), 1);
        assert_eq!((points[0].lat, points[0].lon), (1.0, 2.0));
    }

    #[test]
    fn test_member_type_disambiguates_shared_ids() {
        // Node 5 and way 5 coexist; the member says it wants the way.
        let elements = vec![
            node(5, 99.0, 99.0),
            townhall(OverpassElement {
                members: vec![Member {
                    kind: Some(ElementType::Way),
                    reference: 5,
                    role: "outer".to_string(),
                }],
                ..element(ElementType::Relation, 200)
            }),
            OverpassElement {
                nodes: vec![7],
                ..element(ElementType::Way, 5)
            },
            node(7, 1.0, 2.0),
        ];

        let points = cluster_townhalls(&elements);
        assert_eq!((points[0].lat, points[0].lon), (1.0, 2.0));
    }

    #[test]
    fn test_nodes_pass_through_and_others_are_dropped() {
        let elements = vec![
            townhall(node(1, 47.2, -1.55)),
            node(2, 0.0, 0.0),
            OverpassElement {
                tags: [("amenity".to_string(), "library".to_string())].into(),
                ..node(3, 1.0, 1.0)
            },
        ];

        let points = cluster_townhalls(&elements);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, 1);
        assert_eq!((points[0].lat, points[0].lon), (47.2, -1.55));
    }

    #[test]
    fn test_unresolvable_townhalls_are_skipped() {
        let elements = vec![
            townhall(OverpassElement {
                nodes: vec![404],
                ..element(ElementType::Way, 1)
            }),
            townhall(element(ElementType::Relation, 2)),
            townhall(node(3, 5.0, 6.0)),
        ];

        let points = cluster_townhalls(&elements);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_townhalls(&[]).is_empty());
    }
}
