//! Geodesic bounding-box derivation.
//!
//! The box around a render area is taken from a circle of the requested
//! radius approximated by 64 points along great-circle bearings. Compared
//! to a naive degree-radius box, this keeps the box roughly square in true
//! ground distance away from the equator; the slight over/under-coverage at
//! the corners is acceptable because feature acquisition queries a true
//! distance radius of its own.

use poster_common::{BoundingBox, GeoPoint, PosterError, PosterResult};

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Number of points approximating the geodesic circle.
const CIRCLE_STEPS: usize = 64;

/// Compute the axis-aligned (lon, lat) bounding box of a geodesic circle
/// around `center` with radius `radius_m` meters.
pub fn edges_from_center_radius(center: GeoPoint, radius_m: f64) -> PosterResult<BoundingBox> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(PosterError::InputInvalid(format!(
            "radius must be a positive number of meters, got {}",
            radius_m
        )));
    }

    let lat1 = center.lat.to_radians();
    let lon1 = center.lon.to_radians();
    // Angular distance on the sphere.
    let d = radius_m / EARTH_RADIUS_M;

    let (mut west, mut south) = (f64::INFINITY, f64::INFINITY);
    let (mut east, mut north) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    for step in 0..CIRCLE_STEPS {
        let bearing = 2.0 * std::f64::consts::PI * (step as f64) / (CIRCLE_STEPS as f64);

        let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

        let lon_deg = lon2.to_degrees();
        let lat_deg = lat2.to_degrees();

        west = west.min(lon_deg);
        east = east.max(lon_deg);
        south = south.min(lat_deg);
        north = north.max(lat_deg);
    }

    Ok(BoundingBox::new(west, south, east, north))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> GeoPoint {
        GeoPoint::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn test_center_strictly_inside() {
        let center = paris();
        let bbox = edges_from_center_radius(center, 1000.0).unwrap();

        assert!(bbox.west < bbox.east);
        assert!(bbox.south < bbox.north);
        assert!(center.lon > bbox.west && center.lon < bbox.east);
        assert!(center.lat > bbox.south && center.lat < bbox.north);
    }

    #[test]
    fn test_latitude_span_matches_radius() {
        // One degree of latitude is ~111.2 km everywhere, so a 1 km radius
        // spans ~0.018 degrees north-south.
        let bbox = edges_from_center_radius(paris(), 1000.0).unwrap();
        let span = bbox.height();
        assert!((span - 0.01798).abs() < 0.0005, "lat span {}", span);
    }

    #[test]
    fn test_longitude_span_widens_with_latitude() {
        // At 48.86N a degree of longitude is cos(lat) shorter on the ground,
        // so the same ground radius covers more degrees of longitude.
        let bbox = edges_from_center_radius(paris(), 1000.0).unwrap();
        let expected = 0.01798 / paris().lat.to_radians().cos();
        assert!((bbox.width() - expected).abs() < 0.0008, "lon span {}", bbox.width());
    }

    #[test]
    fn test_equator_box_roughly_square() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        let bbox = edges_from_center_radius(center, 5000.0).unwrap();
        let ratio = bbox.width() / bbox.height();
        assert!((ratio - 1.0).abs() < 0.01, "aspect {}", ratio);
    }

    #[test]
    fn test_high_latitude_box_still_contains_center() {
        let tromso = GeoPoint::new(69.6492, 18.9553).unwrap();
        let bbox = edges_from_center_radius(tromso, 8000.0).unwrap();
        assert!(bbox.contains(tromso.lon, tromso.lat));
        // Far north, the box is much wider in degrees than it is tall.
        assert!(bbox.width() > 2.0 * bbox.height());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(edges_from_center_radius(paris(), 0.0).is_err());
        assert!(edges_from_center_radius(paris(), -250.0).is_err());
        assert!(edges_from_center_radius(paris(), f64::NAN).is_err());
    }
}
