//! The stored JSON form of a layout.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "canvas": { "width": 1200, "height": 800, "zoom": 1, "panX": 0, "panY": 0,
//!               "showGrid": true, "snapToGrid": true, "gridSize": 20 },
//!   "roofs":   [{ "id": "...", "type": "gable", "x": 0, "y": 0, "width": 400, "height": 240,
//!                 "rotation": 0, "locked": false, "color": "#b45309", "imageUrl": "..." }],
//!   "modules": [{ "id": "...", "x": 0, "y": 0, "width": 40, "height": 60,
//!                 "rotation": 0, "locked": false }],
//!   "shapes":  [{ "id": "...", "type": "arrow", "points": [{ "x": 0, "y": 0 }, { "x": 50, "y": 0 }],
//!                 "color": "#ef4444", "lineWidth": 2 }],
//!   "backgroundImage": "..."
//! }
//! ```
//!
//! Selection, tool and history are never stored.

use crate::InterchangeError;
use glam::Vec2;
use scene::{
    Annotation, AnnotationKind, CanvasPoint, CanvasSettings, CanvasSize, ItemId, Layout, Module,
    Roof, LAYOUT_VERSION,
};
use serde::{Deserialize, Serialize};

/// Version written into new documents.
pub const FORMAT_VERSION: &str = LAYOUT_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: String,
    #[serde(default)]
    pub canvas: CanvasDoc,
    #[serde(default)]
    pub roofs: Vec<RoofDoc>,
    #[serde(default)]
    pub modules: Vec<ModuleDoc>,
    #[serde(default)]
    pub shapes: Vec<ShapeDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasDoc {
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: f32,
}

impl Default for CanvasDoc {
    fn default() -> Self {
        Self::from(&CanvasSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoofDoc {
    pub id: String,
    /// Catalog tag, or any foreign tag a `Custom` roof was loaded with.
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub locked: bool,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDoc {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDoc {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDoc {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub points: Vec<PointDoc>,
    pub color: String,
    pub line_width: f32,
}

// === Layout -> Document ===

impl From<&CanvasSettings> for CanvasDoc {
    fn from(canvas: &CanvasSettings) -> Self {
        Self {
            width: canvas.size.width(),
            height: canvas.size.height(),
            zoom: canvas.zoom,
            pan_x: canvas.pan.x,
            pan_y: canvas.pan.y,
            show_grid: canvas.show_grid,
            snap_to_grid: canvas.snap_to_grid,
            grid_size: canvas.grid_size,
        }
    }
}

impl From<&Roof> for RoofDoc {
    fn from(roof: &Roof) -> Self {
        Self {
            id: roof.id.to_string(),
            kind: roof.type_tag(),
            x: roof.position.x(),
            y: roof.position.y(),
            width: roof.size.width(),
            height: roof.size.height(),
            rotation: roof.rotation,
            locked: roof.locked,
            color: roof.color.clone(),
            image_url: roof.image_url.clone(),
        }
    }
}

impl From<&Module> for ModuleDoc {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id.to_string(),
            x: module.position.x(),
            y: module.position.y(),
            width: module.size.width(),
            height: module.size.height(),
            rotation: module.rotation,
            locked: module.locked,
        }
    }
}

impl From<&Annotation> for ShapeDoc {
    fn from(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id.to_string(),
            kind: annotation.kind,
            points: annotation
                .points
                .iter()
                .map(|p| PointDoc { x: p.x(), y: p.y() })
                .collect(),
            color: annotation.color.clone(),
            line_width: annotation.line_width,
        }
    }
}

// === Document -> Layout ===

impl From<CanvasDoc> for CanvasSettings {
    fn from(doc: CanvasDoc) -> Self {
        Self {
            size: CanvasSize::new(doc.width, doc.height),
            zoom: doc.zoom,
            pan: Vec2::new(doc.pan_x, doc.pan_y),
            show_grid: doc.show_grid,
            snap_to_grid: doc.snap_to_grid,
            grid_size: doc.grid_size,
        }
    }
}

impl From<RoofDoc> for Roof {
    fn from(doc: RoofDoc) -> Self {
        let mut roof = Roof::from_tag(&doc.kind, CanvasPoint::new(doc.x, doc.y));
        roof.id = ItemId::from_string(doc.id);
        roof.size = CanvasSize::new(doc.width, doc.height);
        roof.rotation = doc.rotation;
        roof.locked = doc.locked;
        roof.color = doc.color;
        roof.image_url = doc.image_url;
        roof
    }
}

impl From<ModuleDoc> for Module {
    fn from(doc: ModuleDoc) -> Self {
        Self {
            id: ItemId::from_string(doc.id),
            position: CanvasPoint::new(doc.x, doc.y),
            size: CanvasSize::new(doc.width, doc.height),
            rotation: doc.rotation,
            locked: doc.locked,
        }
    }
}

impl From<ShapeDoc> for Annotation {
    fn from(doc: ShapeDoc) -> Self {
        Self {
            id: ItemId::from_string(doc.id),
            kind: doc.kind,
            points: doc.points.into_iter().map(|p| CanvasPoint::new(p.x, p.y)).collect(),
            color: doc.color,
            line_width: doc.line_width,
        }
    }
}

impl Document {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            canvas: CanvasDoc::from(&layout.canvas),
            roofs: layout.roofs.iter().map(RoofDoc::from).collect(),
            modules: layout.modules.iter().map(ModuleDoc::from).collect(),
            shapes: layout.annotations.iter().map(ShapeDoc::from).collect(),
            background_image: layout.background_image.clone(),
        }
    }

    /// Rebuild the layout, repairing anything that breaks the editor's
    /// invariants.
    pub fn into_layout(self) -> Layout {
        let mut layout = Layout {
            version: self.version,
            canvas: self.canvas.into(),
            roofs: self.roofs.into_iter().map(Roof::from).collect(),
            modules: self.modules.into_iter().map(Module::from).collect(),
            annotations: self.shapes.into_iter().map(Annotation::from).collect(),
            background_image: self.background_image,
        };
        let repairs = layout.sanitize();
        if repairs > 0 {
            log::warn!("repaired {} problem(s) in stored layout", repairs);
        }
        layout
    }

    pub fn to_json(&self) -> Result<String, InterchangeError> {
        serde_json::to_string(self).map_err(|e| InterchangeError::InvalidValue(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, InterchangeError> {
        serde_json::to_string_pretty(self).map_err(|e| InterchangeError::InvalidValue(e.to_string()))
    }

    /// Parse a stored document. Documents from a newer major version are
    /// rejected.
    pub fn from_json(input: &str) -> Result<Self, InterchangeError> {
        let doc: Document = serde_json::from_str(input).map_err(|e| {
            if e.is_data() {
                InterchangeError::InvalidStructure(e.to_string())
            } else {
                InterchangeError::Parse(e.to_string())
            }
        })?;

        if major_version(&doc.version) != major_version(FORMAT_VERSION) {
            return Err(InterchangeError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version).trim()
}

/// Decode a stored layout, falling back to an empty default layout when the
/// document is missing or unreadable.
pub fn load_layout(stored: Option<&str>) -> Layout {
    let Some(input) = stored.filter(|s| !s.trim().is_empty()) else {
        log::debug!("no stored layout, starting empty");
        return Layout::default();
    };
    match Document::from_json(input) {
        Ok(doc) => doc.into_layout(),
        Err(e) => {
            log::warn!("stored layout unreadable, starting empty: {}", e);
            Layout::default()
        }
    }
}

/// Scalars stored alongside a layout record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub module_count: usize,
    /// Type tag of the first roof, if any.
    pub roof_type: Option<String>,
}

impl Summary {
    pub fn of(layout: &Layout) -> Self {
        Self {
            module_count: layout.modules.len(),
            roof_type: layout.primary_roof_type(),
        }
    }
}
