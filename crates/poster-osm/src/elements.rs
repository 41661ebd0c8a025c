//! Normalization of raw provider elements into features.
//!
//! The provider returns a flat JSON document of nodes, ways, and relations.
//! This module is the pure conversion boundary: raw bytes in, tagged
//! [`Feature`] geometry out. Tags are preserved verbatim on every emitted
//! feature, and multi-part relations are stitched into polygon ring sets
//! with outer/inner roles respected. Nothing here touches the network or
//! the renderer.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use poster_common::{Feature, Geometry, Ring};

#[derive(Debug, Deserialize)]
struct ElementDocument {
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    members: Vec<RawMember>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "ref")]
    member_ref: i64,
    #[serde(default)]
    role: String,
}

/// Convert a raw element document into normalized features.
///
/// Tagged ways become lines, or single-ring polygons when they close over
/// an area class; tagged relations become polygons or multipolygons with
/// holes. Untagged elements only donate geometry.
pub fn parse_features(raw: &[u8]) -> Result<Vec<Feature>, serde_json::Error> {
    let doc: ElementDocument = serde_json::from_slice(raw)?;
    Ok(assemble(doc))
}

fn assemble(doc: ElementDocument) -> Vec<Feature> {
    let mut node_coords: HashMap<i64, (f64, f64)> = HashMap::new();
    let mut ways: Vec<RawElement> = Vec::new();
    let mut relations: Vec<RawElement> = Vec::new();

    for element in doc.elements {
        match element.kind.as_str() {
            "node" => {
                if let (Some(lat), Some(lon)) = (element.lat, element.lon) {
                    node_coords.insert(element.id, (lon, lat));
                }
            }
            "way" => ways.push(element),
            "relation" => relations.push(element),
            other => debug!(kind = other, id = element.id, "ignoring unknown element kind"),
        }
    }

    // Resolve every way to coordinates first; relations reference ways by id.
    let mut way_coords: HashMap<i64, Vec<(f64, f64)>> = HashMap::new();
    for way in &ways {
        let coords: Vec<(f64, f64)> = way
            .nodes
            .iter()
            .filter_map(|id| node_coords.get(id).copied())
            .collect();
        if coords.len() < way.nodes.len() {
            debug!(
                way = way.id,
                missing = way.nodes.len() - coords.len(),
                "way references nodes absent from the document"
            );
        }
        way_coords.insert(way.id, coords);
    }

    let mut features = Vec::new();

    for way in &ways {
        if way.tags.is_empty() {
            continue;
        }
        let coords = match way_coords.get(&way.id) {
            Some(c) if c.len() >= 2 => c.clone(),
            _ => continue,
        };

        let geometry = if is_closed(&coords) && is_area_way(&way.tags) {
            Geometry::Polygon(vec![coords])
        } else {
            // Closed roads (roundabouts) stay lines: they are stroked, not
            // filled.
            Geometry::LineString(coords)
        };
        features.push(Feature::new(geometry, way.tags.clone()));
    }

    for relation in relations {
        if relation.tags.is_empty() {
            continue;
        }
        if let Some(geometry) = assemble_relation(&relation, &way_coords) {
            features.push(Feature::new(geometry, relation.tags));
        }
    }

    features
}

/// Closed ways fill only for area classes; everything else stays a line.
fn is_area_way(tags: &HashMap<String, String>) -> bool {
    tags.get("natural").map(String::as_str) == Some("water")
        || tags.get("leisure").map(String::as_str) == Some("park")
        || tags.get("area").map(String::as_str) == Some("yes")
}

fn assemble_relation(
    relation: &RawElement,
    way_coords: &HashMap<i64, Vec<(f64, f64)>>,
) -> Option<Geometry> {
    let mut outer_segments: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut inner_segments: Vec<Vec<(f64, f64)>> = Vec::new();

    for member in &relation.members {
        if member.kind != "way" {
            continue;
        }
        let coords = match way_coords.get(&member.member_ref) {
            Some(c) if c.len() >= 2 => c.clone(),
            _ => {
                debug!(
                    relation = relation.id,
                    member = member.member_ref,
                    "relation member way has no usable geometry"
                );
                continue;
            }
        };
        // An empty role means outer in practice.
        if member.role == "inner" {
            inner_segments.push(coords);
        } else {
            outer_segments.push(coords);
        }
    }

    let (outers, dropped_outer) = stitch_rings(outer_segments);
    let (inners, dropped_inner) = stitch_rings(inner_segments);
    if dropped_outer + dropped_inner > 0 {
        warn!(
            relation = relation.id,
            dropped = dropped_outer + dropped_inner,
            "dropped unclosed ring fragments"
        );
    }

    if outers.is_empty() {
        warn!(relation = relation.id, "relation has no closed outer ring");
        return None;
    }

    if outers.len() == 1 {
        let mut rings = outers;
        rings.extend(inners);
        return Some(Geometry::Polygon(rings));
    }

    // Several outer rings: attach each hole to the outer that contains it.
    let mut polygons: Vec<Vec<Ring>> = outers.into_iter().map(|outer| vec![outer]).collect();
    for inner in inners {
        let probe = inner[0];
        match polygons
            .iter_mut()
            .find(|rings| ring_contains(&rings[0], probe))
        {
            Some(rings) => rings.push(inner),
            None => debug!(
                relation = relation.id,
                "inner ring not contained by any outer ring, dropping"
            ),
        }
    }
    Some(Geometry::MultiPolygon(polygons))
}

/// Stitch way segments into closed rings by matching endpoints, reversing
/// segments where needed. Returns the rings plus the count of fragments
/// that never closed.
///
/// Endpoint comparison is exact: both copies of a shared endpoint decode
/// from the same node record, so their bits agree.
fn stitch_rings(mut segments: Vec<Vec<(f64, f64)>>) -> (Vec<Ring>, usize) {
    let mut rings = Vec::new();
    let mut dropped = 0;

    while let Some(mut current) = segments.pop() {
        loop {
            if is_closed(&current) {
                rings.push(current);
                break;
            }

            let tail = current[current.len() - 1];
            let mut extended = false;
            for i in 0..segments.len() {
                if segments[i].first() == Some(&tail) {
                    let segment = segments.swap_remove(i);
                    current.extend(segment.into_iter().skip(1));
                    extended = true;
                    break;
                }
                if segments[i].last() == Some(&tail) {
                    let mut segment = segments.swap_remove(i);
                    segment.reverse();
                    current.extend(segment.into_iter().skip(1));
                    extended = true;
                    break;
                }
            }

            if !extended {
                dropped += 1;
                break;
            }
        }
    }

    (rings, dropped)
}

fn is_closed(coords: &[(f64, f64)]) -> bool {
    coords.len() >= 4 && coords.first() == coords.last()
}

/// Even-odd ray cast: does `ring` contain `point`?
fn ring_contains(ring: &[(f64, f64)], point: (f64, f64)) -> bool {
    let (px, py) = point;
    let mut inside = false;

    for i in 0..ring.len().saturating_sub(1) {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[i + 1];
        if (y1 > py) != (y2 > py) {
            let x_cross = x1 + (py - y1) / (y2 - y1) * (x2 - x1);
            if px < x_cross {
                inside = !inside;
            }
        }
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(elements: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "version": 0.6, "elements": elements })).unwrap()
    }

    fn node(id: i64, lat: f64, lon: f64) -> serde_json::Value {
        json!({ "type": "node", "id": id, "lat": lat, "lon": lon })
    }

    #[test]
    fn test_tagged_way_becomes_line() {
        let raw = doc(json!([
            node(1, 48.85, 2.35),
            node(2, 48.86, 2.36),
            node(3, 48.87, 2.37),
            { "type": "way", "id": 10, "nodes": [1, 2, 3],
              "tags": { "highway": "primary", "name": "Rue de Test" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].tag("highway"), Some("primary"));
        assert_eq!(features[0].tag("name"), Some("Rue de Test"));
        match &features[0].geometry {
            Geometry::LineString(coords) => {
                assert_eq!(coords.len(), 3);
                assert_eq!(coords[0], (2.35, 48.85));
            }
            other => panic!("expected LineString, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_water_way_becomes_polygon() {
        let raw = doc(json!([
            node(1, 0.0, 0.0),
            node(2, 0.0, 1.0),
            node(3, 1.0, 1.0),
            node(4, 1.0, 0.0),
            { "type": "way", "id": 20, "nodes": [1, 2, 3, 4, 1],
              "tags": { "natural": "water" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].is_water());
        match &features[0].geometry {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].first(), rings[0].last());
                assert_eq!(rings[0].len(), 5);
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_road_stays_line() {
        // A roundabout closes on itself but must stroke, not fill.
        let raw = doc(json!([
            node(1, 0.0, 0.0),
            node(2, 0.0, 1.0),
            node(3, 1.0, 1.0),
            node(4, 1.0, 0.0),
            { "type": "way", "id": 30, "nodes": [1, 2, 3, 4, 1],
              "tags": { "highway": "residential", "junction": "roundabout" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        assert!(matches!(features[0].geometry, Geometry::LineString(_)));
    }

    #[test]
    fn test_untagged_ways_only_donate_geometry() {
        let raw = doc(json!([
            node(1, 0.0, 0.0),
            node(2, 0.0, 1.0),
            { "type": "way", "id": 40, "nodes": [1, 2] },
        ]));

        assert!(parse_features(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_relation_outer_inner_becomes_polygon_with_hole() {
        let raw = doc(json!([
            node(1, 0.0, 0.0),
            node(2, 0.0, 10.0),
            node(3, 10.0, 10.0),
            node(4, 10.0, 0.0),
            node(5, 4.0, 4.0),
            node(6, 4.0, 6.0),
            node(7, 6.0, 6.0),
            node(8, 6.0, 4.0),
            { "type": "way", "id": 50, "nodes": [1, 2, 3, 4, 1] },
            { "type": "way", "id": 51, "nodes": [5, 6, 7, 8, 5] },
            { "type": "relation", "id": 100,
              "members": [
                  { "type": "way", "ref": 50, "role": "outer" },
                  { "type": "way", "ref": 51, "role": "inner" },
              ],
              "tags": { "type": "multipolygon", "natural": "water" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].is_water());
        match &features[0].geometry {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 2);
                // Outer first, hole second.
                assert!(ring_contains(&rings[0], (5.0, 5.0)));
                assert!(ring_contains(&rings[1], (5.0, 5.0)));
                assert!(!ring_contains(&rings[1], (1.0, 1.0)));
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_relation_stitches_split_outer_ways() {
        // The outer boundary arrives as two half-rings sharing endpoints,
        // the second one wound backwards.
        let raw = doc(json!([
            node(1, 0.0, 0.0),
            node(2, 0.0, 10.0),
            node(3, 10.0, 10.0),
            node(4, 10.0, 0.0),
            { "type": "way", "id": 60, "nodes": [1, 2, 3] },
            { "type": "way", "id": 61, "nodes": [1, 4, 3] },
            { "type": "relation", "id": 101,
              "members": [
                  { "type": "way", "ref": 60, "role": "outer" },
                  { "type": "way", "ref": 61, "role": "outer" },
              ],
              "tags": { "type": "multipolygon", "leisure": "park" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        match &features[0].geometry {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert!(is_closed(&rings[0]));
                assert_eq!(rings[0].len(), 5);
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_outer_relation_groups_inners() {
        let raw = doc(json!([
            // First outer square at the origin.
            node(1, 0.0, 0.0),
            node(2, 0.0, 1.0),
            node(3, 1.0, 1.0),
            node(4, 1.0, 0.0),
            // Second outer square far away, with a hole inside it.
            node(5, 0.0, 10.0),
            node(6, 0.0, 14.0),
            node(7, 4.0, 14.0),
            node(8, 4.0, 10.0),
            node(9, 1.0, 11.0),
            node(10, 1.0, 13.0),
            node(11, 3.0, 13.0),
            node(12, 3.0, 11.0),
            { "type": "way", "id": 70, "nodes": [1, 2, 3, 4, 1] },
            { "type": "way", "id": 71, "nodes": [5, 6, 7, 8, 5] },
            { "type": "way", "id": 72, "nodes": [9, 10, 11, 12, 9] },
            { "type": "relation", "id": 102,
              "members": [
                  { "type": "way", "ref": 70, "role": "outer" },
                  { "type": "way", "ref": 71, "role": "outer" },
                  { "type": "way", "ref": 72, "role": "inner" },
              ],
              "tags": { "type": "multipolygon", "natural": "water" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        match &features[0].geometry {
            Geometry::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                let with_hole: Vec<_> = polygons.iter().filter(|p| p.len() == 2).collect();
                assert_eq!(with_hole.len(), 1);
                // The hole landed inside the big square, not the small one.
                assert!(ring_contains(&with_hole[0][0], (12.0, 2.0)));
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_fragment_is_dropped() {
        let raw = doc(json!([
            node(1, 0.0, 0.0),
            node(2, 0.0, 10.0),
            node(3, 10.0, 10.0),
            { "type": "way", "id": 80, "nodes": [1, 2, 3] },
            { "type": "relation", "id": 103,
              "members": [ { "type": "way", "ref": 80, "role": "outer" } ],
              "tags": { "natural": "water" } },
        ]));

        // The lone open fragment cannot close into a ring, so the relation
        // yields nothing rather than a corrupt polygon.
        assert!(parse_features(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_way_with_missing_nodes_keeps_resolved_points() {
        let raw = doc(json!([
            node(1, 48.85, 2.35),
            node(2, 48.86, 2.36),
            { "type": "way", "id": 90, "nodes": [1, 2, 999],
              "tags": { "highway": "service" } },
        ]));

        let features = parse_features(&raw).unwrap();
        assert_eq!(features.len(), 1);
        match &features[0].geometry {
            Geometry::LineString(coords) => assert_eq!(coords.len(), 2),
            other => panic!("expected LineString, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(parse_features(b"<html>mirror is down</html>").is_err());
    }

    #[test]
    fn test_empty_document_yields_no_features() {
        let raw = doc(json!([]));
        assert!(parse_features(&raw).unwrap().is_empty());
    }
}
