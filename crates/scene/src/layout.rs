use crate::annotation::Annotation;
use crate::coords::{CanvasPoint, CanvasSize};
use crate::geometry::normalize_rotation;
use crate::module::Module;
use crate::roof::Roof;
use crate::ItemId;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::Display;

/// Format version written into every layout.
pub const LAYOUT_VERSION: &str = "1.0";

pub const DEFAULT_GRID_SIZE: f32 = 20.0;

/// Smallest grid size a loaded layout may keep.
pub const MIN_GRID_SIZE: f32 = 1.0;

/// Canvas dimensions and view settings stored with a layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub size: CanvasSize,
    pub zoom: f32,
    /// Screen-space offset applied after zoom.
    pub pan: Vec2,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            size: CanvasSize::new(1200.0, 800.0),
            zoom: 1.0,
            pan: Vec2::ZERO,
            show_grid: true,
            snap_to_grid: true,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Which collection an id belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum ItemKind {
    Roof,
    Module,
    Annotation,
}

/// The complete, persistable description of one editor document.
///
/// Collections are kept in z-order, back to front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub version: String,
    pub canvas: CanvasSettings,
    pub roofs: Vec<Roof>,
    pub modules: Vec<Module>,
    pub annotations: Vec<Annotation>,
    /// Photo of the site traced over, drawn behind everything else.
    pub background_image: Option<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION.to_string(),
            canvas: CanvasSettings::default(),
            roofs: Vec::new(),
            modules: Vec::new(),
            annotations: Vec::new(),
            background_image: None,
        }
    }
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: CanvasSettings) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roofs.is_empty() && self.modules.is_empty() && self.annotations.is_empty()
    }

    pub fn module(&self, id: &ItemId) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == id)
    }

    pub fn module_mut(&mut self, id: &ItemId) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| &m.id == id)
    }

    pub fn roof(&self, id: &ItemId) -> Option<&Roof> {
        self.roofs.iter().find(|r| &r.id == id)
    }

    pub fn roof_mut(&mut self, id: &ItemId) -> Option<&mut Roof> {
        self.roofs.iter_mut().find(|r| &r.id == id)
    }

    pub fn annotation(&self, id: &ItemId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    /// Which collection holds `id`, if any.
    pub fn item_kind(&self, id: &ItemId) -> Option<ItemKind> {
        if self.module(id).is_some() {
            Some(ItemKind::Module)
        } else if self.roof(id).is_some() {
            Some(ItemKind::Roof)
        } else if self.annotation(id).is_some() {
            Some(ItemKind::Annotation)
        } else {
            None
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.item_kind(id).is_some()
    }

    /// Whether the item exists and is locked. Annotations are never locked.
    pub fn is_locked(&self, id: &ItemId) -> bool {
        self.module(id).map(|m| m.locked).unwrap_or(false)
            || self.roof(id).map(|r| r.locked).unwrap_or(false)
    }

    /// Top-left position of a module or roof.
    pub fn item_position(&self, id: &ItemId) -> Option<CanvasPoint> {
        self.module(id)
            .map(|m| m.position)
            .or_else(|| self.roof(id).map(|r| r.position))
    }

    /// Topmost module under the point.
    pub fn module_at(&self, point: CanvasPoint) -> Option<&Module> {
        self.modules.iter().rev().find(|m| m.contains_point(point))
    }

    /// Topmost roof under the point.
    pub fn roof_at(&self, point: CanvasPoint) -> Option<&Roof> {
        self.roofs.iter().rev().find(|r| r.contains_point(point))
    }

    /// Topmost selectable item under the point. Modules render above roofs, so
    /// they win ties.
    pub fn item_at(&self, point: CanvasPoint) -> Option<(ItemKind, ItemId)> {
        if let Some(module) = self.module_at(point) {
            return Some((ItemKind::Module, module.id.clone()));
        }
        self.roof_at(point)
            .map(|roof| (ItemKind::Roof, roof.id.clone()))
    }

    /// Type tag of the first roof, used as the layout's representative roof type.
    pub fn primary_roof_type(&self) -> Option<String> {
        self.roofs.first().map(Roof::type_tag)
    }

    /// Repair a layout read from storage so the store's invariants hold.
    ///
    /// Rotations are normalized, duplicate ids are reissued, annotations with
    /// too few points are dropped and an unusable grid size is reset. Returns
    /// the number of repairs made.
    pub fn sanitize(&mut self) -> usize {
        let mut repairs = 0;

        if !(self.canvas.grid_size >= MIN_GRID_SIZE && self.canvas.grid_size.is_finite()) {
            self.canvas.grid_size = DEFAULT_GRID_SIZE;
            repairs += 1;
        }
        if !(self.canvas.zoom > 0.0 && self.canvas.zoom.is_finite()) {
            self.canvas.zoom = 1.0;
            repairs += 1;
        }

        let before = self.annotations.len();
        self.annotations.retain(|a| a.is_complete());
        repairs += before - self.annotations.len();

        let mut seen = HashSet::new();
        let mut reissue = |id: &mut ItemId| {
            if !seen.insert(id.clone()) {
                let fresh = ItemId::new();
                log::debug!("reissuing duplicate id {} as {}", id, fresh);
                *id = fresh;
                seen.insert(id.clone());
                1
            } else {
                0
            }
        };

        for roof in &mut self.roofs {
            repairs += reissue(&mut roof.id);
            let normalized = normalize_rotation(roof.rotation);
            if normalized != roof.rotation {
                roof.rotation = normalized;
                repairs += 1;
            }
        }
        for module in &mut self.modules {
            repairs += reissue(&mut module.id);
            let normalized = normalize_rotation(module.rotation);
            if normalized != module.rotation {
                module.rotation = normalized;
                repairs += 1;
            }
        }
        for annotation in &mut self.annotations {
            repairs += reissue(&mut annotation.id);
        }

        repairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use crate::roof::RoofKind;

    fn module_at(x: f32, y: f32) -> Module {
        Module::new(CanvasPoint::new(x, y), CanvasSize::new(40.0, 60.0))
    }

    #[test]
    fn modules_win_over_roofs() {
        let mut layout = Layout::new();
        let roof = Roof::from_template(RoofKind::Flat, CanvasPoint::new(0.0, 0.0));
        let module = module_at(10.0, 10.0);
        layout.roofs.push(roof.clone());
        layout.modules.push(module.clone());

        assert_eq!(
            layout.item_at(CanvasPoint::new(20.0, 20.0)),
            Some((ItemKind::Module, module.id.clone()))
        );
        assert_eq!(
            layout.item_at(CanvasPoint::new(200.0, 200.0)),
            Some((ItemKind::Roof, roof.id.clone()))
        );
        assert_eq!(layout.item_at(CanvasPoint::new(-5.0, -5.0)), None);
    }

    #[test]
    fn topmost_module_wins() {
        let mut layout = Layout::new();
        let below = module_at(0.0, 0.0);
        let above = module_at(20.0, 20.0);
        layout.modules.push(below);
        layout.modules.push(above.clone());
        let hit = layout.module_at(CanvasPoint::new(30.0, 30.0)).map(|m| m.id.clone());
        assert_eq!(hit, Some(above.id));
    }

    #[test]
    fn sanitize_repairs_stored_layouts() {
        let mut layout = Layout::new();
        let mut a = module_at(0.0, 0.0);
        a.rotation = -90.0;
        let mut b = module_at(50.0, 0.0);
        b.id = a.id.clone();
        layout.modules.push(a);
        layout.modules.push(b);
        layout.annotations.push(Annotation::begin(
            AnnotationKind::Line,
            CanvasPoint::new(0.0, 0.0),
            "#000000",
            2.0,
        ));
        layout.canvas.grid_size = 0.0;

        let repairs = layout.sanitize();
        assert_eq!(repairs, 4);
        assert_eq!(layout.modules[0].rotation, 270.0);
        assert_ne!(layout.modules[0].id, layout.modules[1].id);
        assert!(layout.annotations.is_empty());
        assert_eq!(layout.canvas.grid_size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn sanitize_resets_tiny_grid() {
        let mut layout = Layout::new();
        layout.canvas.grid_size = 1e-7;
        assert_eq!(layout.sanitize(), 1);
        assert_eq!(layout.canvas.grid_size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn sanitize_leaves_valid_layout_alone() {
        let mut layout = Layout::new();
        layout.modules.push(module_at(0.0, 0.0));
        layout.roofs.push(Roof::from_template(RoofKind::Hip, CanvasPoint::new(0.0, 0.0)));
        let before = layout.clone();
        assert_eq!(layout.sanitize(), 0);
        assert_eq!(layout, before);
    }

    #[test]
    fn primary_roof_type_is_first_roof() {
        let mut layout = Layout::new();
        assert_eq!(layout.primary_roof_type(), None);
        layout.roofs.push(Roof::from_template(RoofKind::Shed, CanvasPoint::default()));
        layout.roofs.push(Roof::from_template(RoofKind::Flat, CanvasPoint::default()));
        assert_eq!(layout.primary_roof_type().as_deref(), Some("shed"));
    }
}
