//! A surface that records draw calls instead of rasterizing them.

use crate::surface::{DrawingSurface, StrokeStyle, SurfaceError};
use glam::{Affine2, Vec2};
use std::collections::HashMap;
use theme::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetTransform(Affine2),
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    StrokeRect {
        origin: Vec2,
        size: Vec2,
        style: StrokeStyle,
    },
    Polyline {
        points: Vec<Vec2>,
        style: StrokeStyle,
    },
    Image {
        source: String,
        origin: Vec2,
        size: Vec2,
    },
    Text {
        text: String,
        center: Vec2,
        font_size: f32,
        color: Color,
    },
}

/// Records every call in order. Images are "available" only when registered
/// with [`RecordingSurface::with_image`].
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    images: HashMap<String, Vec2>,
    transform: Affine2,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, source: impl Into<String>, size: Vec2) -> Self {
        self.images.insert(source.into(), size);
        self
    }

    /// The transform that was active when the command at `index` ran.
    pub fn transform_at(&self, index: usize) -> Affine2 {
        self.commands[..index]
            .iter()
            .rev()
            .find_map(|c| match c {
                DrawCommand::SetTransform(t) => Some(*t),
                _ => None,
            })
            .unwrap_or(Affine2::IDENTITY)
    }

    pub fn current_transform(&self) -> Affine2 {
        self.transform
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_transform(&mut self, transform: Affine2) {
        self.transform = transform;
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            origin,
            size,
            style: style.clone(),
        });
    }

    fn draw_polyline(&mut self, points: &[Vec2], style: &StrokeStyle) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn image_size(&mut self, source: &str) -> Option<Vec2> {
        self.images.get(source).copied()
    }

    fn draw_image(&mut self, source: &str, origin: Vec2, size: Vec2) -> Result<(), SurfaceError> {
        if !self.images.contains_key(source) {
            return Err(SurfaceError::ImageUnavailable(source.to_string()));
        }
        self.commands.push(DrawCommand::Image {
            source: source.to_string(),
            origin,
            size,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, center: Vec2, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            center,
            font_size,
            color,
        });
    }
}
