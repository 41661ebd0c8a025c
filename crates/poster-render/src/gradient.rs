//! Bottom-edge gradient fade behind the poster captions.

use poster_common::{Color, PosterError, PosterResult};
use tiny_skia::{
    GradientStop, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform,
};

/// Fraction of the crop height covered by the fade band.
pub const FADE_FRACTION: f64 = 0.28;

/// Paint a vertical fade over the bottom of the cropped poster: fully
/// transparent at the band top, the theme's gradient color at the bottom
/// edge. Rows above the band are untouched.
pub fn apply_gradient(canvas: &mut Pixmap, color: Color) -> PosterResult<()> {
    let width = canvas.width();
    let height = canvas.height();
    let band = (f64::from(height) * FADE_FRACTION).floor() as u32;
    if band == 0 {
        return Ok(());
    }

    let top = (height - band) as f32;
    let stops = vec![
        GradientStop::new(0.0, tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 0)),
        GradientStop::new(
            1.0,
            tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a),
        ),
    ];
    let shader = LinearGradient::new(
        Point::from_xy(0.0, top),
        Point::from_xy(0.0, height as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| PosterError::RenderFailure("gradient shader rejected".to_string()))?;

    let rect = Rect::from_xywh(0.0, top, width as f32, band as f32).ok_or_else(|| {
        PosterError::RenderFailure(format!("empty gradient band {}x{}", width, band))
    })?;

    let paint = Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    };
    canvas.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(())
}
