//! Normalized map features: tagged geometry plus key/value properties.

use std::collections::HashMap;

/// A ring of (lon, lat) positions. Closed rings repeat the first position
/// as the last.
pub type Ring = Vec<(f64, f64)>;

/// Geometry of one map feature. Coordinates are always (lon, lat) degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// One outer ring followed by any interior rings (holes).
    Polygon(Vec<Ring>),
    /// Several ring sets, each a polygon in its own right.
    MultiPolygon(Vec<Vec<Ring>>),
    /// An open path of at least two positions.
    LineString(Vec<(f64, f64)>),
    /// Several open paths.
    MultiLineString(Vec<Vec<(f64, f64)>>),
}

impl Geometry {
    /// True for fillable area geometry (polygons).
    pub fn is_area(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    /// True for strokeable line geometry.
    pub fn is_line(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }
}

/// One normalized map feature: geometry plus its descriptive tags.
///
/// Features are immutable once acquired and owned by the render request
/// that fetched them.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub tags: HashMap<String, String>,
}

impl Feature {
    pub fn new(geometry: Geometry, tags: HashMap<String, String>) -> Self {
        Self { geometry, tags }
    }

    /// Look up a tag value by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// True for water bodies (`natural=water`).
    pub fn is_water(&self) -> bool {
        self.tag("natural") == Some("water")
    }

    /// True for parks (`leisure=park`).
    pub fn is_park(&self) -> bool {
        self.tag("leisure") == Some("park")
    }

    /// The `highway` classification, if present and non-empty.
    pub fn highway(&self) -> Option<&str> {
        self.tag("highway").filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_tag_helpers() {
        let water = Feature::new(
            Geometry::Polygon(vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]]),
            tags(&[("natural", "water"), ("name", "Lac Test")]),
        );
        assert!(water.is_water());
        assert!(!water.is_park());
        assert_eq!(water.tag("name"), Some("Lac Test"));
        assert!(water.highway().is_none());
    }

    #[test]
    fn test_empty_highway_is_none() {
        let road = Feature::new(
            Geometry::LineString(vec![(0.0, 0.0), (1.0, 1.0)]),
            tags(&[("highway", "")]),
        );
        assert!(road.highway().is_none());
    }

    #[test]
    fn test_geometry_kind_predicates() {
        assert!(Geometry::Polygon(vec![]).is_area());
        assert!(Geometry::MultiPolygon(vec![]).is_area());
        assert!(!Geometry::LineString(vec![]).is_area());
        assert!(Geometry::LineString(vec![]).is_line());
        assert!(Geometry::MultiLineString(vec![]).is_line());
        assert!(!Geometry::MultiPolygon(vec![]).is_line());
    }
}
