//! Paints a layout onto a [`DrawingSurface`].
//!
//! Z-order is fixed: background, grid, roofs, annotations, modules. Selection
//! only changes fills, border weights and dashes.

use crate::surface::{DrawingSurface, StrokeStyle};
use canvas::{Editor, Viewport};
use glam::{Affine2, Vec2};
use scene::{Annotation, AnnotationKind, CanvasSettings, ItemId, Layout, Module, Roof, RotatedRect};
use std::collections::HashSet;
use std::f32::consts::FRAC_PI_6;
use theme::{parse_hex_or, with_alpha, Color, Theme};

const LABEL_FONT_SIZE: f32 = 14.0;
const LOCK_GLYPH_SIZE: f32 = 12.0;
const MODULE_CELL_SIZE: f32 = 20.0;
const MODULE_INSET: f32 = 2.0;
/// Cap on grid lines per axis; finer grids are drawn at a multiple of their step.
const MAX_GRID_LINES: u32 = 1000;
const MAX_MODULE_CELLS: f32 = 64.0;

/// Everything needed to paint one frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub layout: &'a Layout,
    pub selection: Option<&'a HashSet<ItemId>>,
    /// Annotation being drawn, painted above committed ones.
    pub in_progress: Option<&'a Annotation>,
}

impl<'a> Frame<'a> {
    /// A frame with nothing selected and no gesture in progress.
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            selection: None,
            in_progress: None,
        }
    }

    pub fn from_editor(editor: &'a Editor) -> Self {
        Self {
            layout: editor.store.layout(),
            selection: Some(editor.store.selection()),
            in_progress: editor.controller().in_progress_annotation(),
        }
    }

    fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.map(|s| s.contains(id)).unwrap_or(false)
    }
}

/// Stateless painter for layouts.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    pub theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, surface: &mut dyn DrawingSurface, frame: &Frame) {
        let layout = frame.layout;
        let view = Viewport::from_canvas(&layout.canvas).transform();
        let theme = &self.theme;

        surface.set_transform(view);
        paint_background(surface, layout, theme);
        if layout.canvas.show_grid {
            paint_grid(surface, &layout.canvas, theme);
        }

        for roof in &layout.roofs {
            paint_roof(surface, view, roof, frame.is_selected(&roof.id), theme);
        }

        surface.set_transform(view);
        for annotation in layout.annotations.iter().chain(frame.in_progress) {
            paint_annotation(surface, annotation, theme);
        }

        for module in &layout.modules {
            paint_module(surface, view, module, frame.is_selected(&module.id), theme);
        }
    }
}

/// Where an image of `natural` size lands when fitted into `bounds` without
/// distortion, centered along the axis with slack.
pub fn letterbox(natural: Vec2, bounds: Vec2) -> (Vec2, Vec2) {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return (Vec2::ZERO, bounds);
    }
    let scale = (bounds.x / natural.x).min(bounds.y / natural.y);
    let size = natural * scale;
    ((bounds - size) / 2.0, size)
}

fn paint_background(surface: &mut dyn DrawingSurface, layout: &Layout, theme: &Theme) {
    let bounds = layout.canvas.size.0;
    surface.fill_rect(Vec2::ZERO, bounds, theme.canvas_background);

    let Some(source) = layout.background_image.as_deref() else {
        return;
    };
    let Some(natural) = surface.image_size(source) else {
        log::warn!("background image {} unavailable, using flat fill", source);
        return;
    };
    let (origin, size) = letterbox(natural, bounds);
    if let Err(e) = surface.draw_image(source, origin, size) {
        log::warn!("failed to draw background image: {}", e);
    }
}

fn paint_grid(surface: &mut dyn DrawingSurface, canvas: &CanvasSettings, theme: &Theme) {
    let step = canvas.grid_size;
    if !(step > 0.0 && step.is_finite()) {
        return;
    }
    let size = canvas.size.0;
    let style = StrokeStyle::solid(theme.grid, 0.5);

    for x in grid_offsets(size.x, step) {
        surface.draw_polyline(&[Vec2::new(x, 0.0), Vec2::new(x, size.y)], &style);
    }
    for y in grid_offsets(size.y, step) {
        surface.draw_polyline(&[Vec2::new(0.0, y), Vec2::new(size.x, y)], &style);
    }
}

/// Offsets of grid lines in `[0, extent]`, thinned to at most
/// `MAX_GRID_LINES + 1`.
fn grid_offsets(extent: f32, step: f32) -> impl Iterator<Item = f32> {
    let lines = (extent / step).floor().max(0.0);
    let stride = (lines / MAX_GRID_LINES as f32).ceil().max(1.0);
    let step = step * stride;
    let count = (extent / step).floor().clamp(0.0, MAX_GRID_LINES as f32) as u32;
    (0..=count).map(move |i| i as f32 * step)
}

/// Set the transform that maps a rect's local frame (origin at its center)
/// to the screen, returning the rect's top-left and size in that frame.
fn enter_rect(surface: &mut dyn DrawingSurface, view: Affine2, rect: &RotatedRect) -> (Vec2, Vec2) {
    surface.set_transform(view * rect.transform());
    rect.local_bounds()
}

fn paint_roof(
    surface: &mut dyn DrawingSurface,
    view: Affine2,
    roof: &Roof,
    selected: bool,
    theme: &Theme,
) {
    let (origin, size) = enter_rect(surface, view, &roof.rect());

    let fill = parse_hex_or(&roof.color, theme.roof_border);
    surface.fill_rect(origin, size, with_alpha(fill, theme.roof_fill_alpha));

    if let Some(image) = roof.image_url.as_deref() {
        if let Err(e) = surface.draw_image(image, origin, size) {
            log::warn!("roof {} image skipped: {}", roof.id, e);
        }
    }

    let border = if selected {
        StrokeStyle::dashed(theme.selection, 2.0, 6.0, 4.0)
    } else {
        StrokeStyle::solid(theme.roof_border, 1.0)
    };
    surface.stroke_rect(origin, size, &border);

    surface.fill_text(roof.kind.label(), Vec2::ZERO, LABEL_FONT_SIZE, theme.roof_label);

    if roof.locked {
        paint_lock(surface, origin + size, theme.lock);
    }
}

fn paint_annotation(surface: &mut dyn DrawingSurface, annotation: &Annotation, theme: &Theme) {
    let (Some(start), Some(end)) = (annotation.start(), annotation.end()) else {
        return;
    };
    if annotation.points.len() < 2 {
        return;
    }
    let style = StrokeStyle::solid(
        parse_hex_or(&annotation.color, theme.roof_border),
        annotation.line_width,
    );

    match annotation.kind {
        AnnotationKind::Line => surface.draw_polyline(&[start.0, end.0], &style),
        AnnotationKind::Arrow => {
            surface.draw_polyline(&[start.0, end.0], &style);
            if let Some([left, right]) = arrowhead(start.0, end.0, annotation.line_width) {
                surface.draw_polyline(&[left, end.0, right], &style);
            }
        }
        AnnotationKind::Rectangle => {
            let min = start.0.min(end.0);
            let max = start.0.max(end.0);
            surface.stroke_rect(min, max - min, &style);
        }
        AnnotationKind::Freehand => {
            let points: Vec<Vec2> = annotation.points.iter().map(|p| p.0).collect();
            surface.draw_polyline(&points, &style);
        }
    }
}

/// The two barb ends of an arrowhead at `end`. `None` for a zero-length arrow.
fn arrowhead(start: Vec2, end: Vec2, line_width: f32) -> Option<[Vec2; 2]> {
    let direction = end - start;
    if direction.length_squared() == 0.0 {
        return None;
    }
    let angle = direction.y.atan2(direction.x);
    let length = 12.0 + line_width * 2.0;
    let barb = |a: f32| end - Vec2::new(a.cos(), a.sin()) * length;
    Some([barb(angle - FRAC_PI_6), barb(angle + FRAC_PI_6)])
}

fn paint_module(
    surface: &mut dyn DrawingSurface,
    view: Affine2,
    module: &Module,
    selected: bool,
    theme: &Theme,
) {
    let (origin, size) = enter_rect(surface, view, &module.rect());

    let (outer, inner) = if selected {
        (theme.module_fill_selected, theme.module_fill_selected_inner)
    } else {
        (theme.module_fill, theme.module_fill_inner)
    };
    surface.fill_rect(origin, size, outer);
    let inset = Vec2::splat(MODULE_INSET);
    surface.fill_rect(origin + inset, (size - inset * 2.0).max(Vec2::ZERO), inner);

    // cell grid
    let cells = (size / MODULE_CELL_SIZE)
        .round()
        .clamp(Vec2::ONE, Vec2::splat(MAX_MODULE_CELLS));
    let cell_style = StrokeStyle::solid(theme.module_cells, 0.5);
    for i in 1..cells.x as u32 {
        let x = origin.x + size.x * i as f32 / cells.x;
        surface.draw_polyline(&[Vec2::new(x, origin.y), Vec2::new(x, origin.y + size.y)], &cell_style);
    }
    for j in 1..cells.y as u32 {
        let y = origin.y + size.y * j as f32 / cells.y;
        surface.draw_polyline(&[Vec2::new(origin.x, y), Vec2::new(origin.x + size.x, y)], &cell_style);
    }

    let border = if selected {
        StrokeStyle::solid(theme.selection, 2.5)
    } else {
        StrokeStyle::solid(theme.module_border, 1.0)
    };
    surface.stroke_rect(origin, size, &border);

    if module.locked {
        paint_lock(surface, origin + size, theme.lock);
    }
}

/// A small padlock tucked inside the bottom-right corner at `corner`.
fn paint_lock(surface: &mut dyn DrawingSurface, corner: Vec2, color: Color) {
    let s = LOCK_GLYPH_SIZE;
    let body_origin = corner - Vec2::new(s + 2.0, s * 0.6 + 2.0);
    let body_size = Vec2::new(s, s * 0.6);
    surface.fill_rect(body_origin, body_size, color);

    let left = body_origin.x + s * 0.25;
    let right = body_origin.x + s * 0.75;
    let top = body_origin.y - s * 0.4;
    surface.draw_polyline(
        &[
            Vec2::new(left, body_origin.y),
            Vec2::new(left, top),
            Vec2::new(right, top),
            Vec2::new(right, body_origin.y),
        ],
        &StrokeStyle::solid(color, 1.5),
    );
}
