//! Common types and utilities shared across all map-poster crates.

pub mod error;
pub mod feature;
pub mod geo;
pub mod theme;

pub use error::{PosterError, PosterResult};
pub use feature::{Feature, Geometry, Ring};
pub use geo::{BoundingBox, GeoPoint};
pub use theme::{Color, Theme, ThemeStore};
