//! Poster rasterization for map features.
//!
//! Composes the poster in deterministic stages over one owned surface:
//! - Background fill from the theme
//! - Even-odd water/park area fills
//! - Road strokes, narrow classes first
//! - Center crop, gradient fade, tracked typography
//! - PNG encoding (indexed or RGBA)

pub mod areas;
pub mod canvas;
pub mod gradient;
pub mod png;
pub mod poster;
pub mod roads;
pub mod style;
pub mod text;

pub use canvas::CanvasPlan;
pub use poster::{compose_poster, PosterLabels};
pub use text::coords_label;
