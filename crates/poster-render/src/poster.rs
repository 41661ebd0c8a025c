//! Top-level poster composition.
//!
//! `compose_poster` runs the full layer pipeline over one working canvas:
//! background, water and park fills, width-ordered road strokes, center
//! crop, bottom gradient fade, divider, captions, PNG encoding.

use poster_common::{Feature, PosterResult, Theme};
use poster_projection::Projector;
use tracing::debug;

use crate::areas::fill_areas;
use crate::canvas::{crop_center, into_rgba_image, new_canvas, CanvasPlan};
use crate::gradient::apply_gradient;
use crate::png::create_png_auto;
use crate::roads::stroke_roads;
use crate::text::{
    coords_label, draw_caption, draw_divider, load_font, COORDS_HEIGHT_FRAC, COORDS_SIZE_FRAC,
    COUNTRY_HEIGHT_FRAC, COUNTRY_SIZE_FRAC, TITLE_HEIGHT_FRAC, TITLE_SIZE_FRAC,
};

/// The three caption lines printed over the bottom gradient band.
#[derive(Debug, Clone, Default)]
pub struct PosterLabels {
    /// Large headline, usually the city name.
    pub title: String,
    /// Second line under the divider, usually the country.
    pub country: String,
    /// Coordinate line, formatted via [`coords_label`].
    pub coords: String,
}

impl PosterLabels {
    pub fn new(title: impl Into<String>, country: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            title: title.into(),
            country: country.into(),
            coords: coords_label(lat, lon),
        }
    }
}

/// Compose a finished poster and encode it as PNG bytes.
///
/// The projector must target the plan's *working* dimensions; rendering
/// happens at working scale and the result is center-cropped down to the
/// requested output size before the typography pass.
pub fn compose_poster(
    features: &[Feature],
    theme: &Theme,
    projector: &Projector,
    plan: CanvasPlan,
    labels: &PosterLabels,
) -> PosterResult<Vec<u8>> {
    let areas = features.iter().filter(|f| f.geometry.is_area()).count();
    let roads = features
        .iter()
        .filter(|f| f.geometry.is_line() && f.highway().is_some())
        .count();
    debug!(
        working_width = plan.working_width,
        working_height = plan.working_height,
        crop_width = plan.crop_width,
        crop_height = plan.crop_height,
        areas,
        roads,
        theme = %theme.name,
        "composing poster"
    );

    let mut canvas = new_canvas(plan.working_width, plan.working_height, theme.bg)?;
    fill_areas(&mut canvas, features, projector, theme.water, theme.parks)?;
    stroke_roads(&mut canvas, features, projector, theme)?;

    let mut cropped = crop_center(&canvas, plan.crop_width, plan.crop_height)?;
    apply_gradient(&mut cropped, theme.gradient_color)?;
    draw_divider(&mut cropped, theme.text)?;

    let font = load_font()?;
    let mut image = into_rgba_image(&cropped)?;
    draw_caption(
        &mut image,
        &font,
        &labels.title,
        theme.text,
        TITLE_SIZE_FRAC,
        TITLE_HEIGHT_FRAC,
    );
    draw_caption(
        &mut image,
        &font,
        &labels.country,
        theme.text,
        COUNTRY_SIZE_FRAC,
        COUNTRY_HEIGHT_FRAC,
    );
    draw_caption(
        &mut image,
        &font,
        &labels.coords,
        theme.text,
        COORDS_SIZE_FRAC,
        COORDS_HEIGHT_FRAC,
    );

    let (width, height) = image.dimensions();
    create_png_auto(image.as_raw(), width as usize, height as usize)
}
