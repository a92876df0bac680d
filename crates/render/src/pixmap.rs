//! Raster surface backed by `tiny-skia`, used for PNG export.
//!
//! Text is not rasterized: there is no font stack, so labels are skipped.

use crate::surface::{DrawingSurface, StrokeStyle, SurfaceError};
use glam::{Affine2, Vec2};
use std::collections::HashMap;
use std::path::PathBuf;
use theme::Color;
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, StrokeDash, Transform,
};

pub struct PixmapSurface {
    pixmap: Pixmap,
    transform: Transform,
    /// Directory relative image references are resolved against.
    image_root: Option<PathBuf>,
    /// Decoded images; `None` marks a reference that failed to load.
    images: HashMap<String, Option<Pixmap>>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            image_root: None,
            images: HashMap::new(),
        })
    }

    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = Some(root.into());
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode the frame as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let source = source.strip_prefix("file://").unwrap_or(source);
        match &self.image_root {
            Some(root) => root.join(source),
            None => PathBuf::from(source),
        }
    }

    fn load_image(&mut self, source: &str) -> Option<&Pixmap> {
        if !self.images.contains_key(source) {
            let path = self.resolve(source);
            let image = match Pixmap::load_png(&path) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("failed to load image {}: {}", path.display(), e);
                    None
                }
            };
            self.images.insert(source.to_string(), image);
        }
        self.images.get(source).and_then(|image| image.as_ref())
    }
}

fn to_skia_transform(transform: Affine2) -> Transform {
    let m = transform.matrix2;
    let t = transform.translation;
    Transform::from_row(m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, t.x, t.y)
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.red.clamp(0.0, 1.0),
        color.green.clamp(0.0, 1.0),
        color.blue.clamp(0.0, 1.0),
        color.alpha.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::BLACK)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

fn stroke_for(style: &StrokeStyle) -> Stroke {
    Stroke {
        width: style.width,
        dash: style
            .dash
            .and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0)),
        ..Stroke::default()
    }
}

/// A rect with non-negative extents, or `None` when it has no area.
fn rect(origin: Vec2, size: Vec2) -> Option<Rect> {
    let min = origin.min(origin + size);
    let extent = size.abs();
    Rect::from_xywh(min.x, min.y, extent.x, extent.y)
}

impl DrawingSurface for PixmapSurface {
    fn set_transform(&mut self, transform: Affine2) {
        self.transform = to_skia_transform(transform);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let Some(rect) = rect(origin, size) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        self.pixmap
            .fill_path(&path, &paint_for(color), FillRule::Winding, self.transform, None);
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, style: &StrokeStyle) {
        let Some(rect) = rect(origin, size) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        self.pixmap.stroke_path(
            &path,
            &paint_for(style.color),
            &stroke_for(style),
            self.transform,
            None,
        );
    }

    fn draw_polyline(&mut self, points: &[Vec2], style: &StrokeStyle) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &paint_for(style.color),
                &stroke_for(style),
                self.transform,
                None,
            );
        }
    }

    fn image_size(&mut self, source: &str) -> Option<Vec2> {
        self.load_image(source)
            .map(|image| Vec2::new(image.width() as f32, image.height() as f32))
    }

    fn draw_image(&mut self, source: &str, origin: Vec2, size: Vec2) -> Result<(), SurfaceError> {
        if self.load_image(source).is_none() {
            return Err(SurfaceError::ImageUnavailable(source.to_string()));
        }
        let Some(Some(image)) = self.images.get(source) else {
            return Err(SurfaceError::ImageUnavailable(source.to_string()));
        };
        let natural = Vec2::new(image.width() as f32, image.height() as f32);
        let placement = Transform::from_row(
            size.x / natural.x,
            0.0,
            0.0,
            size.y / natural.y,
            origin.x,
            origin.y,
        );
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &PixmapPaint::default(),
            self.transform.pre_concat(placement),
            None,
        );
        Ok(())
    }

    fn fill_text(&mut self, text: &str, _center: Vec2, _font_size: f32, _color: Color) {
        log::trace!("skipping text {:?} on raster surface", text);
    }
}
