//! Water and park area fills.

use poster_common::{Color, Feature, Geometry, PosterResult, Ring};
use poster_projection::Projector;
use tiny_skia::{FillRule, PathBuilder, Pixmap, Transform};

use crate::canvas::{project_point, solid_paint};

/// Fill every water and park area feature, in input order.
///
/// All rings of a feature go into one path filled with the even-odd rule,
/// so interior rings punch holes that keep the layers underneath visible.
pub fn fill_areas(
    canvas: &mut Pixmap,
    features: &[Feature],
    projector: &Projector,
    water: Color,
    parks: Color,
) -> PosterResult<()> {
    for feature in features {
        if !feature.geometry.is_area() {
            continue;
        }
        if feature.is_water() {
            fill_feature(canvas, feature, projector, water)?;
        }
        if feature.is_park() {
            fill_feature(canvas, feature, projector, parks)?;
        }
    }
    Ok(())
}

fn fill_feature(
    canvas: &mut Pixmap,
    feature: &Feature,
    projector: &Projector,
    color: Color,
) -> PosterResult<()> {
    let mut pb = PathBuilder::new();
    match &feature.geometry {
        Geometry::Polygon(rings) => add_rings(&mut pb, rings, projector)?,
        Geometry::MultiPolygon(polygons) => {
            for rings in polygons {
                add_rings(&mut pb, rings, projector)?;
            }
        }
        _ => return Ok(()),
    }

    if let Some(path) = pb.finish() {
        canvas.fill_path(
            &path,
            &solid_paint(color),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }
    Ok(())
}

fn add_rings(pb: &mut PathBuilder, rings: &[Ring], projector: &Projector) -> PosterResult<()> {
    for ring in rings {
        let mut positions = ring.iter();
        let Some(&(lon, lat)) = positions.next() else {
            continue;
        };
        let (x, y) = project_point(projector, lon, lat)?;
        pb.move_to(x, y);
        for &(lon, lat) in positions {
            let (x, y) = project_point(projector, lon, lat)?;
            pb.line_to(x, y);
        }
        pb.close();
    }
    Ok(())
}
