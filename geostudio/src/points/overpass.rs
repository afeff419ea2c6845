//! Overpass API query construction and response model.
//!
//! # Area selection
//!
//! Cities are either place names or numeric OpenStreetMap relation ids.
//! Overpass derives area ids from relation ids by adding
//! [`OVERPASS_AREA_OFFSET`]; names are matched on the `name` tag at the
//! requested administrative level.
//!
//! ```text
//! "Nantes"  → area["name"="Nantes"]["admin_level"="8"]->.searchArea;
//! "59874"   → area(3600059874)->.searchArea;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::Deserialize;

use super::PointsError;
use crate::geo::{is_numeric_id, Point};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Administrative level of French communes.
pub const DEFAULT_ADMIN_LEVEL: u8 = 8;

/// Offset between relation ids and the derived Overpass area ids.
pub const OVERPASS_AREA_OFFSET: u64 = 3_600_000_000;

/// Server-side timeout requested in every query, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 60;

/// The kind of points requested from the map API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestCore {
    /// Town halls, mapped as nodes, ways or relations.
    Townhalls,
    /// Public transport stop positions and bus stops.
    Stops,
}

impl RequestCore {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestCore::Townhalls => "townhalls",
            RequestCore::Stops => "stops",
        }
    }

    /// Statements selecting this core's elements inside `.searchArea`.
    fn statements(&self) -> &'static str {
        match self {
            RequestCore::Townhalls => {
                r#"(nwr["amenity"="townhall"](area.searchArea););(._;>;);"#
            }
            RequestCore::Stops => {
                r#"(node["public_transport"="stop_position"](area.searchArea);node["highway"="bus_stop"](area.searchArea););"#
            }
        }
    }
}

impl fmt::Display for RequestCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestCore {
    type Err = PointsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "townhalls" => Ok(RequestCore::Townhalls),
            "stops" => Ok(RequestCore::Stops),
            other => Err(PointsError::UnknownRequestCore(other.to_string())),
        }
    }
}

/// Builds the area selector for `city`.
fn area_statement(city: &str, admin_level: u8) -> String {
    let area_id = Some(city)
        .filter(|c| is_numeric_id(c))
        .and_then(|c| c.parse::<u64>().ok())
        .and_then(|id| OVERPASS_AREA_OFFSET.checked_add(id));

    match area_id {
        Some(area_id) => format!("area({})->.searchArea;", area_id),
        None => {
            let name = city.replace('\\', "\\\\").replace('"', "\\\"");
            format!(
                r#"area["name"="{}"]["admin_level"="{}"]->.searchArea;"#,
                name, admin_level
            )
        }
    }
}

/// Builds the Overpass QL query for `core` inside `city`.
pub fn build_query(city: &str, core: RequestCore, admin_level: u8) -> String {
    format!(
        "[out:json][timeout:{}];{}{}out;",
        QUERY_TIMEOUT_SECS,
        area_statement(city, admin_level),
        core.statements()
    )
}

/// Builds the full request URL, with the query URL-encoded as `data`.
pub fn query_url(
    endpoint: &str,
    city: &str,
    core: RequestCore,
    admin_level: u8,
) -> Result<Url, PointsError> {
    let query = build_query(city, core, admin_level);
    Url::parse_with_params(endpoint, &[("data", query)])
        .map_err(|e| PointsError::InvalidEndpoint(format!("{}: {}", endpoint, e)))
}

/// OpenStreetMap element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

/// Relation member reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    #[serde(rename = "type", default)]
    pub kind: Option<ElementType>,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

/// One element of an Overpass JSON response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverpassElement {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ElementType,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl OverpassElement {
    /// Returns the element's own coordinate, if it carries one.
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Converts a located element into a [`Point`].
    pub fn to_point(&self) -> Option<Point> {
        let (lat, lon) = self.coordinate()?;
        Some(Point {
            id: self.id,
            lat,
            lon,
            tags: self.tags.clone(),
        })
    }
}

/// Overpass JSON response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_core_parse() {
        assert_eq!("townhalls".parse::<RequestCore>().unwrap(), RequestCore::Townhalls);
        assert_eq!("stops".parse::<RequestCore>().unwrap(), RequestCore::Stops);
        assert!(matches!(
            "bikes".parse::<RequestCore>(),
            Err(PointsError::UnknownRequestCore(ref s)) if s == "bikes"
        ));
    }

    #[test]
    fn test_named_city_query() {
        let query = build_query("Nantes", RequestCore::Townhalls, DEFAULT_ADMIN_LEVEL);
        assert_eq!(
            query,
            r#"[out:json][timeout:60];area["name"="Nantes"]["admin_level"="8"]->.searchArea;(nwr["amenity"="townhall"](area.searchArea););(._;>;);out;"#
        );
    }

    #[test]
    fn test_numeric_city_query_uses_area_id() {
        let query = build_query("59874", RequestCore::Stops, DEFAULT_ADMIN_LEVEL);
        assert!(query.contains("area(3600059874)->.searchArea;"));
        assert!(query.contains(r#"node["highway"="bus_stop"](area.searchArea);"#));
        assert!(!query.contains("admin_level"));
    }

    #[test]
    fn test_quotes_in_city_are_escaped() {
        let query = build_query(r#"Saint "X""#, RequestCore::Stops, 7);
        assert!(query.contains(r#"area["name"="Saint \"X\""]["admin_level"="7"]"#));
    }

    #[test]
    fn test_query_url_encodes_data() {
        let url = query_url(
            DEFAULT_OVERPASS_URL,
            "Nantes",
            RequestCore::Townhalls,
            DEFAULT_ADMIN_LEVEL,
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("overpass-api.de"));
        let (name, value) = url.query_pairs().next().unwrap();
        assert_eq!(name, "data");
        assert_eq!(
            value,
            build_query("Nantes", RequestCore::Townhalls, DEFAULT_ADMIN_LEVEL)
        );
    }

    #[test]
    fn test_query_url_rejects_invalid_endpoint() {
        let result = query_url("not a url", "Nantes", RequestCore::Stops, 8);
        assert!(matches!(result, Err(PointsError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_element_deserialization() {
        let json = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 47.2, "lon": -1.55, "tags": {"amenity": "townhall"}},
                {"type": "way", "id": 2, "nodes": [1, 3]},
                {"type": "relation", "id": 4, "members": [{"type": "way", "ref": 2, "role": "outer"}]},
                {"type": "area", "id": 5}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.elements.len(), 4);

        let node = &response.elements[0];
        assert_eq!(node.kind, ElementType::Node);
        assert_eq!(node.tag("amenity"), Some("townhall"));
        assert_eq!(node.coordinate(), Some((47.2, -1.55)));

        assert_eq!(response.elements[1].nodes, vec![1, 3]);
        assert_eq!(response.elements[1].coordinate(), None);
        assert_eq!(response.elements[2].members[0].reference, 2);
        assert_eq!(response.elements[2].members[0].kind, Some(ElementType::Way));
        assert_eq!(response.elements[3].kind, ElementType::Other);
    }
}
