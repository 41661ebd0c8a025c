//! Canvas sizing and surface plumbing shared by the layer passes.

use image::RgbaImage;
use poster_common::{Color, PosterError, PosterResult};
use poster_projection::Projector;
use tiny_skia::{IntRect, Paint, Pixmap, Shader};

/// Hard upper bound on either working-canvas dimension.
pub const MAX_CANVAS_DIM: u32 = 8192;

/// Horizontal overscan of the working canvas relative to the crop (5/3).
const OVERSCAN_X: (u64, u64) = (5, 3);
/// Vertical overscan of the working canvas relative to the crop (3/2).
const OVERSCAN_Y: (u64, u64) = (3, 2);

/// Canvas sizing for one render.
///
/// The caller's width/height are the final crop; map layers draw on a
/// larger working canvas so strokes and fills near the poster edge keep
/// their surroundings, then the center is cut out. The working canvas is
/// always at least as large as the crop, so the crop offset cannot go
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasPlan {
    pub working_width: u32,
    pub working_height: u32,
    pub crop_width: u32,
    pub crop_height: u32,
}

impl CanvasPlan {
    /// Derive the working-canvas size for a requested crop size.
    ///
    /// A zero dimension or a working canvas past [`MAX_CANVAS_DIM`] on
    /// either axis is rejected as invalid input.
    pub fn for_crop(crop_width: u32, crop_height: u32) -> PosterResult<Self> {
        if crop_width == 0 || crop_height == 0 {
            return Err(PosterError::InputInvalid(format!(
                "poster size {}x{} has a zero dimension",
                crop_width, crop_height
            )));
        }

        let working_width = u64::from(crop_width) * OVERSCAN_X.0 / OVERSCAN_X.1;
        let working_height = u64::from(crop_height) * OVERSCAN_Y.0 / OVERSCAN_Y.1;
        if working_width > u64::from(MAX_CANVAS_DIM) || working_height > u64::from(MAX_CANVAS_DIM)
        {
            return Err(PosterError::InputInvalid(format!(
                "poster size {}x{} needs a {}x{} working canvas, past the {} pixel limit",
                crop_width, crop_height, working_width, working_height, MAX_CANVAS_DIM
            )));
        }

        Ok(Self {
            working_width: working_width as u32,
            working_height: working_height as u32,
            crop_width,
            crop_height,
        })
    }
}

/// An opaque paint for one theme color, anti-aliased.
pub(crate) fn solid_paint(color: Color) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        )),
        anti_alias: true,
        ..Paint::default()
    }
}

/// Project one position and convert to canvas-space f32, rejecting
/// non-finite results before they can poison a path.
pub(crate) fn project_point(
    projector: &Projector,
    lon: f64,
    lat: f64,
) -> PosterResult<(f32, f32)> {
    let (x, y) = projector.project(lon, lat);
    if !x.is_finite() || !y.is_finite() {
        return Err(PosterError::RenderFailure(format!(
            "projection of ({}, {}) is not finite",
            lon, lat
        )));
    }
    Ok((x as f32, y as f32))
}

/// Allocate the working canvas pre-filled with the background color.
pub fn new_canvas(width: u32, height: u32, bg: Color) -> PosterResult<Pixmap> {
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        PosterError::RenderFailure(format!("cannot allocate a {}x{} canvas", width, height))
    })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    Ok(pixmap)
}

/// Cut the centered crop out of the working canvas.
pub fn crop_center(canvas: &Pixmap, crop_width: u32, crop_height: u32) -> PosterResult<Pixmap> {
    if crop_width > canvas.width() || crop_height > canvas.height() {
        return Err(PosterError::RenderFailure(format!(
            "crop {}x{} does not fit the {}x{} canvas",
            crop_width,
            crop_height,
            canvas.width(),
            canvas.height()
        )));
    }

    let dx = ((canvas.width() - crop_width) / 2) as i32;
    let dy = ((canvas.height() - crop_height) / 2) as i32;
    let rect = IntRect::from_xywh(dx, dy, crop_width, crop_height).ok_or_else(|| {
        PosterError::RenderFailure(format!("empty crop rectangle {}x{}", crop_width, crop_height))
    })?;

    canvas.clone_rect(rect).ok_or_else(|| {
        PosterError::RenderFailure(format!(
            "crop {}x{}+{}+{} out of canvas bounds",
            crop_width, crop_height, dx, dy
        ))
    })
}

/// Convert the premultiplied surface into a straight-alpha RGBA image for
/// the typography pass and encoding.
pub fn into_rgba_image(canvas: &Pixmap) -> PosterResult<RgbaImage> {
    let mut data = Vec::with_capacity(canvas.width() as usize * canvas.height() as usize * 4);
    for pixel in canvas.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(canvas.width(), canvas.height(), data)
        .ok_or_else(|| PosterError::RenderFailure("canvas buffer size mismatch".to_string()))
}
