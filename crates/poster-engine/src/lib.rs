//! Poster generation pipeline.
//!
//! One engine per process ties the stages together: place resolution,
//! theme lookup, feature acquisition, projection, composition. Each call
//! to [`PosterEngine::generate`] runs one request end to end and returns
//! the encoded poster with its printed metadata.

pub mod lookup;
pub mod request;

pub use lookup::{NominatimLookup, Place, PlaceLookup};
pub use request::{Location, PosterRequest, DEFAULT_RADIUS_M, MAX_RADIUS_M};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use poster_common::{GeoPoint, PosterResult, ThemeStore};
use poster_osm::OverpassClient;
use poster_projection::{edges_from_center_radius, Projector};
use poster_render::{compose_poster, CanvasPlan, PosterLabels};

/// A finished poster plus the metadata printed on it.
#[derive(Debug, Clone)]
pub struct Poster {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub country: String,
    pub coords_label: String,
}

/// Shared, immutable pipeline state: the loaded themes and the two
/// network clients. One engine serves any number of sequential requests.
pub struct PosterEngine {
    themes: ThemeStore,
    overpass: OverpassClient,
    lookup: Arc<dyn PlaceLookup>,
}

impl PosterEngine {
    pub fn new(themes: ThemeStore, overpass: OverpassClient, lookup: Arc<dyn PlaceLookup>) -> Self {
        Self {
            themes,
            overpass,
            lookup,
        }
    }

    /// Names of every loaded theme, for listings and error messages.
    pub fn theme_names(&self) -> Vec<&str> {
        self.themes.names()
    }

    /// Run one render request end to end.
    ///
    /// Fails fast: the request is validated and the theme resolved before
    /// any network call, and the first stage error aborts the pipeline.
    /// There are no partial posters.
    #[instrument(skip(self, request), fields(theme = %request.theme))]
    pub async fn generate(&self, request: &PosterRequest) -> PosterResult<Poster> {
        request.validate()?;
        let theme = self.themes.get(&request.theme)?;
        let plan = CanvasPlan::for_crop(request.width, request.height)?;

        let (center, place) = self.resolve_location(&request.location).await?;

        let acquire_started = Instant::now();
        let features = self
            .overpass
            .fetch_features(center, request.radius_m)
            .await?;
        debug!(
            count = features.len(),
            elapsed_ms = acquire_started.elapsed().as_millis() as u64,
            "features acquired"
        );

        let bounds = edges_from_center_radius(center, request.radius_m)?;
        let projector = Projector::new(bounds, plan.working_width, plan.working_height)?;

        let labels = PosterLabels::new(&place.city, &place.country, center.lat, center.lon);
        let compose_started = Instant::now();
        let png = compose_poster(&features, theme, &projector, plan, &labels)?;
        debug!(
            bytes = png.len(),
            elapsed_ms = compose_started.elapsed().as_millis() as u64,
            "poster composed"
        );

        info!(
            title = %labels.title,
            country = %labels.country,
            width = request.width,
            height = request.height,
            "poster generated"
        );
        Ok(Poster {
            png,
            width: request.width,
            height: request.height,
            title: labels.title,
            country: labels.country,
            coords_label: labels.coords,
        })
    }

    /// Complete the half of the location the caller did not provide.
    async fn resolve_location(&self, location: &Location) -> PosterResult<(GeoPoint, Place)> {
        match location {
            Location::Center(point) => {
                let place = self.lookup.reverse(*point).await?;
                Ok((*point, place))
            }
            Location::Place { city, country } => {
                let point = self.lookup.geocode(city, country).await?;
                Ok((
                    point,
                    Place {
                        city: city.clone(),
                        country: country.clone(),
                    },
                ))
            }
        }
    }
}
