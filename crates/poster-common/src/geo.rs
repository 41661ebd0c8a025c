//! Geographic primitives: points and bounding boxes in degrees.

use serde::{Deserialize, Serialize};

use crate::error::{PosterError, PosterResult};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, validating coordinate ranges and finiteness.
    pub fn new(lat: f64, lon: f64) -> PosterResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PosterError::InputInvalid(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(PosterError::InputInvalid(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// A geographic bounding box in degrees.
///
/// Boxes are derived (from a center point and radius), never hand-edited,
/// so the constructor does not validate edge ordering; consumers that need
/// non-degenerate bounds check [`BoundingBox::is_degenerate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from edge coordinates.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Width of the box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height of the box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Check if a (lon, lat) position is contained within this box.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// True when the box has no usable area and cannot support a projection.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}
