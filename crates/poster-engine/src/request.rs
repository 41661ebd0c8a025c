//! The render request surface and its validation rules.

use poster_common::{GeoPoint, PosterError, PosterResult};

/// Radius used when the caller does not specify one.
pub const DEFAULT_RADIUS_M: f64 = 8_000.0;

/// Largest area a single poster may cover. The flat projection degrades
/// beyond city scale, and query sizes grow quadratically with radius.
pub const MAX_RADIUS_M: f64 = 100_000.0;

/// Default output size, a 3:4 portrait print.
pub const DEFAULT_WIDTH: u32 = 3000;
pub const DEFAULT_HEIGHT: u32 = 4000;

/// Where the poster is centered: an exact point, or a named place that a
/// lookup service resolves to one.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Center(GeoPoint),
    Place { city: String, country: String },
}

/// One poster render request.
///
/// Construct with [`PosterRequest::new`] for defaults, then override fields
/// as needed. [`PosterRequest::validate`] runs before any work starts.
#[derive(Debug, Clone)]
pub struct PosterRequest {
    pub location: Location,
    /// Coverage radius around the center, in meters.
    pub radius_m: f64,
    /// Theme name, resolved against the loaded store.
    pub theme: String,
    /// Output (crop) size in pixels.
    pub width: u32,
    pub height: u32,
    /// Contact identifier forwarded to the lookup service, required by its
    /// usage policy.
    pub attribution: String,
}

impl PosterRequest {
    pub fn new(
        location: Location,
        theme: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Self {
        Self {
            location,
            radius_m: DEFAULT_RADIUS_M,
            theme: theme.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            attribution: attribution.into(),
        }
    }

    /// Check everything that can be checked without leaving the process.
    /// Theme existence and canvas bounds are enforced downstream.
    pub fn validate(&self) -> PosterResult<()> {
        if let Location::Place { city, country } = &self.location {
            if city.trim().is_empty() || country.trim().is_empty() {
                return Err(PosterError::InputInvalid(
                    "place location needs both a city and a country".to_string(),
                ));
            }
        }

        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(PosterError::InputInvalid(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_m
            )));
        }
        if self.radius_m > MAX_RADIUS_M {
            return Err(PosterError::InputInvalid(format!(
                "radius {} m exceeds the maximum of {} m",
                self.radius_m, MAX_RADIUS_M
            )));
        }

        if self.attribution.trim().is_empty() {
            return Err(PosterError::InputInvalid(
                "an attribution contact is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris_request() -> PosterRequest {
        PosterRequest::new(
            Location::Center(GeoPoint::new(48.8566, 2.3522).unwrap()),
            "noir",
            "poster@example.com",
        )
    }

    #[test]
    fn test_defaults() {
        let request = paris_request();
        assert_eq!(request.radius_m, DEFAULT_RADIUS_M);
        assert_eq!((request.width, request.height), (3000, 4000));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_radius_must_be_positive_and_finite() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut request = paris_request();
            request.radius_m = bad;
            assert!(
                matches!(request.validate(), Err(PosterError::InputInvalid(_))),
                "radius {} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_radius_cap() {
        let mut request = paris_request();
        request.radius_m = MAX_RADIUS_M;
        assert!(request.validate().is_ok());
        request.radius_m = MAX_RADIUS_M + 1.0;
        assert!(matches!(
            request.validate(),
            Err(PosterError::InputInvalid(_))
        ));
    }

    #[test]
    fn test_place_needs_both_names() {
        for (city, country) in [("", "France"), ("Paris", ""), ("  ", "France")] {
            let request = PosterRequest::new(
                Location::Place {
                    city: city.to_string(),
                    country: country.to_string(),
                },
                "noir",
                "poster@example.com",
            );
            assert!(
                matches!(request.validate(), Err(PosterError::InputInvalid(_))),
                "city={:?} country={:?} accepted",
                city,
                country
            );
        }
    }

    #[test]
    fn test_attribution_required() {
        let mut request = paris_request();
        request.attribution = "  ".to_string();
        assert!(matches!(
            request.validate(),
            Err(PosterError::InputInvalid(_))
        ));
    }
}
