//! Poster typography: tracked uppercase captions, the divider, and the
//! coordinate label.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use poster_common::{Color, PosterError, PosterResult};
use rusttype::{Font, Scale};
use tiny_skia::{LineCap, PathBuilder, Pixmap, Stroke, Transform};

use crate::canvas::solid_paint;

/// Embedded font data - DejaVu Sans (a clean, widely readable sans face)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Title caption: glyph size and baseline as fractions of the crop height.
pub const TITLE_SIZE_FRAC: f64 = 0.06;
pub const TITLE_HEIGHT_FRAC: f64 = 0.8;

/// Country caption fractions.
pub const COUNTRY_SIZE_FRAC: f64 = 0.03;
pub const COUNTRY_HEIGHT_FRAC: f64 = 0.89;

/// Coordinate caption fractions.
pub const COORDS_SIZE_FRAC: f64 = 0.018;
pub const COORDS_HEIGHT_FRAC: f64 = 0.93;

/// Divider position and geometry: a short rule between title and country.
const DIVIDER_HEIGHT_FRAC: f32 = 0.88;
const DIVIDER_SPAN: (f32, f32) = (0.42, 0.58);
const DIVIDER_WIDTH: f32 = 8.0;

/// Letter tracking as a fraction of the glyph size, with a 2 px floor.
const TRACKING_FRAC: f32 = 0.12;

/// Parse the embedded face once per render.
pub fn load_font() -> PosterResult<Font<'static>> {
    Font::try_from_bytes(FONT_DATA)
        .ok_or_else(|| PosterError::RenderFailure("embedded font failed to parse".to_string()))
}

/// Draw one caption line, uppercased, letter-tracked, and horizontally
/// centered.
///
/// The glyph size is `size_frac` of the canvas height and the line's top
/// sits at `height_frac` of it. Tracking is added after every glyph and
/// counted once per gap when centering, so the tracked line as a whole is
/// centered rather than its first glyph.
pub fn draw_caption(
    img: &mut RgbaImage,
    font: &Font,
    text: &str,
    color: Color,
    size_frac: f64,
    height_frac: f64,
) {
    let height = f64::from(img.height());
    let size = (height * size_frac).floor() as f32;
    if size < 1.0 {
        return;
    }
    let scale = Scale::uniform(size);
    let spacing = (size * TRACKING_FRAC).max(2.0);

    let text = text.to_uppercase();
    let glyphs: Vec<char> = text.chars().collect();
    if glyphs.is_empty() {
        return;
    }

    let widths: Vec<f32> = glyphs
        .iter()
        .map(|&ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
        .collect();
    let total: f32 =
        widths.iter().sum::<f32>() + spacing * (glyphs.len() - 1) as f32;

    let mut x = (img.width() as f32 - total) / 2.0;
    let y = (height * height_frac).floor() as i32;
    let fill = Rgba([color.r, color.g, color.b, color.a]);

    for (i, &ch) in glyphs.iter().enumerate() {
        draw_text_mut(img, fill, x.round() as i32, y, scale, font, &ch.to_string());
        x += widths[i] + spacing;
    }
}

/// Stroke the round-capped divider rule across the caption block.
pub fn draw_divider(canvas: &mut Pixmap, color: Color) -> PosterResult<()> {
    let width = canvas.width() as f32;
    let y = canvas.height() as f32 * DIVIDER_HEIGHT_FRAC;

    let mut pb = PathBuilder::new();
    pb.move_to(DIVIDER_SPAN.0 * width, y);
    pb.line_to(DIVIDER_SPAN.1 * width, y);
    let path = pb
        .finish()
        .ok_or_else(|| PosterError::RenderFailure("divider path rejected".to_string()))?;

    let stroke = Stroke {
        width: DIVIDER_WIDTH,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };
    canvas.stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
    Ok(())
}

/// Format the coordinate caption for a poster center.
///
/// Magnitudes are unsigned with hemisphere letters carrying the sign, and
/// each magnitude keeps at most four decimal places; the tail is cut, not
/// rounded, and shorter values pass through unchanged.
pub fn coords_label(lat: f64, lon: f64) -> String {
    let ns = if lat < 0.0 { 'S' } else { 'N' };
    let ew = if lon < 0.0 { 'W' } else { 'E' };
    format!(
        "{}° {} / {}° {}",
        truncate_decimals(lat.abs(), 4),
        ns,
        truncate_decimals(lon.abs(), 4),
        ew
    )
}

// Cutting the printed form avoids the off-by-one-ulp surprises of numeric
// truncation: 48.8566 stays 48.8566.
fn truncate_decimals(value: f64, places: usize) -> String {
    let s = value.to_string();
    match s.find('.') {
        Some(dot) => {
            let end = (dot + 1 + places).min(s.len());
            s[..end].to_string()
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: Color = Color::rgba(245, 245, 245, 255);

    #[test]
    fn test_coords_label_paris() {
        assert_eq!(coords_label(48.8566, 2.3522), "48.8566° N / 2.3522° E");
    }

    #[test]
    fn test_coords_label_hemispheres() {
        assert_eq!(coords_label(-33.8688, 151.2093), "33.8688° S / 151.2093° E");
        assert_eq!(coords_label(40.7128, -74.006), "40.7128° N / 74.006° W");
        assert_eq!(coords_label(-22.9068, -43.1729), "22.9068° S / 43.1729° W");
    }

    #[test]
    fn test_coords_label_truncates_instead_of_rounding() {
        assert_eq!(coords_label(48.85666666, 2.35229999), "48.8566° N / 2.3522° E");
        assert_eq!(coords_label(1.99999, 0.0), "1.9999° N / 0° E");
    }

    #[test]
    fn test_coords_label_short_values_unchanged() {
        assert_eq!(coords_label(48.0, 2.35), "48° N / 2.35° E");
        assert_eq!(coords_label(0.0, 0.0), "0° N / 0° E");
    }

    #[test]
    fn test_caption_paints_text_pixels() {
        let mut img = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 0, 255]));
        let font = load_font().unwrap();
        draw_caption(&mut img, &font, "Paris", TEXT, 0.3, 0.1);

        let lit = img.pixels().filter(|p| p.0[0] > 200).count();
        assert!(lit > 50, "expected a visible caption, got {} lit pixels", lit);
    }

    #[test]
    fn test_empty_caption_paints_nothing() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let font = load_font().unwrap();
        draw_caption(&mut img, &font, "", TEXT, 0.3, 0.1);

        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_caption_is_roughly_centered() {
        let mut img = RgbaImage::from_pixel(400, 100, Rgba([0, 0, 0, 255]));
        let font = load_font().unwrap();
        draw_caption(&mut img, &font, "OO", TEXT, 0.4, 0.2);

        let lit_x: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 100)
            .map(|(x, _, _)| x)
            .collect();
        let min = *lit_x.iter().min().unwrap();
        let max = *lit_x.iter().max().unwrap();
        let mid = (min + max) as f64 / 2.0;
        assert!(
            (mid - 200.0).abs() < 8.0,
            "caption should straddle the canvas center, got {}",
            mid
        );
    }

    #[test]
    fn test_divider_strokes_its_row_only() {
        let mut canvas =
            crate::canvas::new_canvas(100, 100, Color::rgba(0, 0, 0, 255)).unwrap();
        draw_divider(&mut canvas, TEXT).unwrap();

        let at = |x: u32, y: u32| {
            let p = canvas.pixel(x, y).map(|p| p.demultiply()).expect("in bounds");
            [p.red(), p.green(), p.blue(), p.alpha()]
        };

        // y = 88 +- 4, x from 42 to 58 plus round caps.
        assert_eq!(at(50, 88), [245, 245, 245, 255]);
        assert_eq!(at(50, 70), [0, 0, 0, 255]);
        assert_eq!(at(20, 88), [0, 0, 0, 255]);
        assert_eq!(at(80, 88), [0, 0, 0, 255]);
    }
}
