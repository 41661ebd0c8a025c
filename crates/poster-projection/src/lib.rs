//! Geographic-to-pixel coordinate mapping for poster rendering.
//!
//! Implements the geodesic bounding-box derivation and the flat linear
//! projection from scratch without external dependencies.

pub mod geodesic;
pub mod linear;

pub use geodesic::edges_from_center_radius;
pub use linear::Projector;
