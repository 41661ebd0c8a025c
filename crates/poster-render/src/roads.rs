//! Road strokes, ordered so wider classes paint over narrower ones.

use poster_common::{Color, Feature, Geometry, PosterResult, Theme};
use poster_projection::Projector;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::canvas::{project_point, solid_paint};
use crate::style::{road_color, road_width};

/// Stroke every tagged road feature with round caps and joins.
///
/// Roads are sorted ascending by class width before painting; the sort is
/// stable, so equally wide classes keep their input order. Painting the
/// widest classes last means they win every crossing.
pub fn stroke_roads(
    canvas: &mut Pixmap,
    features: &[Feature],
    projector: &Projector,
    theme: &Theme,
) -> PosterResult<()> {
    let mut roads: Vec<(&Feature, Color, f32)> = features
        .iter()
        .filter(|f| f.geometry.is_line())
        .filter_map(|f| {
            f.highway()
                .map(|hw| (f, road_color(theme, hw), road_width(hw)))
        })
        .collect();

    roads.sort_by(|a, b| a.2.total_cmp(&b.2));

    for (feature, color, width) in roads {
        stroke_feature(canvas, feature, projector, color, width)?;
    }
    Ok(())
}

fn stroke_feature(
    canvas: &mut Pixmap,
    feature: &Feature,
    projector: &Projector,
    color: Color,
    width: f32,
) -> PosterResult<()> {
    let paint = solid_paint(color);
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    match &feature.geometry {
        Geometry::LineString(positions) => {
            stroke_polyline(canvas, positions, projector, &paint, &stroke)?;
        }
        Geometry::MultiLineString(lines) => {
            for positions in lines {
                stroke_polyline(canvas, positions, projector, &paint, &stroke)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn stroke_polyline(
    canvas: &mut Pixmap,
    positions: &[(f64, f64)],
    projector: &Projector,
    paint: &Paint,
    stroke: &Stroke,
) -> PosterResult<()> {
    if positions.len() < 2 {
        return Ok(());
    }

    let mut pb = PathBuilder::new();
    let (x, y) = project_point(projector, positions[0].0, positions[0].1)?;
    pb.move_to(x, y);
    for &(lon, lat) in &positions[1..] {
        let (x, y) = project_point(projector, lon, lat)?;
        pb.line_to(x, y);
    }

    if let Some(path) = pb.finish() {
        canvas.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
    Ok(())
}
