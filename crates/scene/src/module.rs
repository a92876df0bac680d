use crate::coords::{CanvasDelta, CanvasPoint, CanvasSize};
use crate::geometry::{normalize_rotation, RotatedRect};
use crate::ItemId;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// One solar panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: ItemId,
    /// Top-left corner before rotation.
    pub position: CanvasPoint,
    pub size: CanvasSize,
    /// Degrees in `[0, 360)`.
    pub rotation: f32,
    pub locked: bool,
}

impl Module {
    pub fn new(position: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            id: ItemId::new(),
            position,
            size,
            rotation: 0.0,
            locked: false,
        }
    }

    pub fn rect(&self) -> RotatedRect {
        RotatedRect::new(self.position, self.size, self.rotation)
    }

    pub fn contains_point(&self, point: CanvasPoint) -> bool {
        self.rect().contains(point)
    }

    pub fn rotate_by(&mut self, delta: f32) {
        self.rotation = normalize_rotation(self.rotation + delta);
    }

    pub fn translate(&mut self, delta: CanvasDelta) {
        self.position = self.position + delta;
    }

    /// Merge the present fields of a patch into this module.
    pub fn apply(&mut self, patch: &ModulePatch) {
        if let Some(x) = patch.x {
            self.position.0.x = x;
        }
        if let Some(y) = patch.y {
            self.position.0.y = y;
        }
        if let Some(width) = patch.width {
            self.size.0.x = width;
        }
        if let Some(height) = patch.height {
            self.size.0.y = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = normalize_rotation(rotation);
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
    }
}

/// A partial update for a [`Module`]. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulePatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub locked: Option<bool>,
}

impl ModulePatch {
    pub fn position(position: CanvasPoint) -> Self {
        Self {
            x: Some(position.x()),
            y: Some(position.y()),
            ..Default::default()
        }
    }
}

/// Axis along which a generated row of modules advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowOrientation {
    /// Increasing x.
    #[default]
    Horizontal,
    /// Increasing y.
    Vertical,
}

/// Lay out `count` unrotated, unlocked modules starting at `origin`.
///
/// Consecutive modules are separated by `spacing` plus the module's own
/// extent along the row axis.
pub fn module_row(
    origin: CanvasPoint,
    count: usize,
    orientation: RowOrientation,
    spacing: f32,
    size: CanvasSize,
) -> Vec<Module> {
    let step = match orientation {
        RowOrientation::Horizontal => CanvasDelta::new(size.width() + spacing, 0.0),
        RowOrientation::Vertical => CanvasDelta::new(0.0, size.height() + spacing),
    };
    (0..count)
        .map(|index| {
            let offset = CanvasDelta(step.0 * index as f32);
            Module::new(origin + offset, size)
        })
        .collect()
}
