//! The drawing backend seam.

use glam::{Affine2, Vec2};
use std::fmt;
use theme::Color;

/// How an outline is stroked.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// On/off lengths of a dash pattern; `None` is a solid line.
    pub dash: Option<[f32; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, on: f32, off: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([on, off]),
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The image reference could not be resolved or decoded.
    ImageUnavailable(String),
    /// The surface could not allocate a frame of the requested size.
    InvalidSize { width: u32, height: u32 },
    /// Encoding the finished frame failed.
    Encode(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ImageUnavailable(source) => write!(f, "image unavailable: {}", source),
            SurfaceError::InvalidSize { width, height } => {
                write!(f, "cannot create a {}x{} frame", width, height)
            }
            SurfaceError::Encode(msg) => write!(f, "failed to encode frame: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// A 2D drawing target.
///
/// All geometry is given in the coordinate space established by the last
/// [`set_transform`](DrawingSurface::set_transform) call.
pub trait DrawingSurface {
    /// Replace the current transform (not composed with the previous one).
    fn set_transform(&mut self, transform: Affine2);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, style: &StrokeStyle);

    /// Stroke connected segments through `points`. Fewer than two points draw
    /// nothing.
    fn draw_polyline(&mut self, points: &[Vec2], style: &StrokeStyle);

    /// Natural size of an image, if it can be loaded.
    fn image_size(&mut self, source: &str) -> Option<Vec2>;

    /// Draw an image stretched into the given rectangle.
    fn draw_image(&mut self, source: &str, origin: Vec2, size: Vec2) -> Result<(), SurfaceError>;

    /// Draw a single line of text centered on `center`.
    fn fill_text(&mut self, text: &str, center: Vec2, font_size: f32, color: Color);
}
