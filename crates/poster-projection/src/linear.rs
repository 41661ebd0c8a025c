//! Flat linear (equirectangular) projection onto a pixel canvas.

use poster_common::{BoundingBox, PosterError, PosterResult};

/// Pure mapping from (lon, lat) to pixel coordinates, closed over a fixed
/// bounding box and canvas size for the lifetime of one render.
///
/// The mapping is linear in both axes; y is flipped because image row 0 is
/// the top of the canvas while geographic north is the maximum latitude.
/// Copyable and side-effect free, so one projector can serve any number of
/// points concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    west: f64,
    south: f64,
    lon_span: f64,
    lat_span: f64,
    width: f64,
    height: f64,
}

impl Projector {
    /// Build a projector for a bounding box and canvas size.
    ///
    /// Fails with `InvalidBounds` when the box has no extent (degenerate
    /// radius or coincident points) or the canvas has a zero dimension;
    /// projection would otherwise divide by zero.
    pub fn new(bounds: BoundingBox, width: u32, height: u32) -> PosterResult<Self> {
        if bounds.is_degenerate() {
            return Err(PosterError::InvalidBounds(format!(
                "bounding box has no area: west={} south={} east={} north={}",
                bounds.west, bounds.south, bounds.east, bounds.north
            )));
        }
        if width == 0 || height == 0 {
            return Err(PosterError::InvalidBounds(format!(
                "canvas {}x{} has a zero dimension",
                width, height
            )));
        }

        Ok(Self {
            west: bounds.west,
            south: bounds.south,
            lon_span: bounds.width(),
            lat_span: bounds.height(),
            width: f64::from(width),
            height: f64::from(height),
        })
    }

    /// Project a (lon, lat) position to fractional pixel coordinates.
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = (lon - self.west) / self.lon_span * self.width;
        let y = (1.0 - (lat - self.south) / self.lat_span) * self.height;
        (x, y)
    }
}
