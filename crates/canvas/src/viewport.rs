use glam::{Affine2, Vec2};
use scene::{CanvasPoint, CanvasSettings, ScreenPoint};

/// Camera state for the layout canvas.
///
/// Screen coordinates are `canvas * zoom + pan`, so panning by a screen delta
/// is independent of the zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen-space offset applied after zoom
    pub pan: Vec2,
    /// Zoom level (1.0 = 100%)
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(pan: Vec2, zoom: f32) -> Self {
        Self { pan, zoom }
    }

    pub fn from_canvas(canvas: &CanvasSettings) -> Self {
        Self {
            pan: canvas.pan,
            zoom: canvas.zoom,
        }
    }

    /// Convert a point from screen coordinates to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: ScreenPoint) -> CanvasPoint {
        CanvasPoint((screen_point.0 - self.pan) / self.zoom)
    }

    /// Convert a point from canvas coordinates to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: CanvasPoint) -> ScreenPoint {
        ScreenPoint(canvas_point.0 * self.zoom + self.pan)
    }

    /// The canvas-to-screen transform.
    pub fn transform(&self) -> Affine2 {
        Affine2::from_translation(self.pan) * Affine2::from_scale(Vec2::splat(self.zoom))
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom, keeping a screen point fixed over the same canvas point.
    pub fn zoom_to(&mut self, screen_point: ScreenPoint, zoom: f32) {
        let anchor = self.screen_to_canvas(screen_point);
        self.zoom = zoom;
        self.pan = screen_point.0 - anchor.0 * self.zoom;
    }
}
