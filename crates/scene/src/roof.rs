use crate::coords::{CanvasDelta, CanvasPoint, CanvasSize};
use crate::geometry::{normalize_rotation, RotatedRect};
use crate::ItemId;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// The kind of roof surface, chosen from a fixed template catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoofKind {
    #[default]
    Gable,
    Hip,
    Flat,
    Shed,
    Gambrel,
    Mansard,
    Carport,
    GroundMount,
    /// Any tag not in the catalog. Stored documents with unknown roof types load as this.
    #[serde(other)]
    Custom,
}

/// Default geometry and styling for a roof kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoofTemplate {
    pub kind: RoofKind,
    pub label: &'static str,
    pub size: CanvasSize,
    /// Hex fill color.
    pub color: &'static str,
}

impl RoofKind {
    pub fn template(self) -> RoofTemplate {
        let (label, width, height, color) = match self {
            RoofKind::Gable => ("Gable", 400.0, 240.0, "#b45309"),
            RoofKind::Hip => ("Hip", 360.0, 260.0, "#92400e"),
            RoofKind::Flat => ("Flat", 420.0, 300.0, "#6b7280"),
            RoofKind::Shed => ("Shed", 320.0, 200.0, "#a16207"),
            RoofKind::Gambrel => ("Gambrel", 380.0, 240.0, "#9a3412"),
            RoofKind::Mansard => ("Mansard", 360.0, 280.0, "#7c2d12"),
            RoofKind::Carport => ("Carport", 300.0, 180.0, "#475569"),
            RoofKind::GroundMount => ("Ground mount", 480.0, 160.0, "#4d7c0f"),
            RoofKind::Custom => ("Custom", 300.0, 200.0, "#78716c"),
        };
        RoofTemplate {
            kind: self,
            label,
            size: CanvasSize::new(width, height),
            color,
        }
    }

    pub fn label(self) -> &'static str {
        self.template().label
    }

    /// Parse a stored type tag. Tags outside the catalog map to `Custom`.
    pub fn from_tag(tag: &str) -> Self {
        Self::iter()
            .find(|kind| kind.to_string() == tag)
            .unwrap_or(RoofKind::Custom)
    }
}

/// A roof surface or mounting area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roof {
    pub id: ItemId,
    pub kind: RoofKind,
    /// Top-left corner before rotation.
    pub position: CanvasPoint,
    pub size: CanvasSize,
    /// Degrees in `[0, 360)`.
    pub rotation: f32,
    pub locked: bool,
    /// Hex fill color.
    pub color: String,
    /// Optional photo or drawing of this roof, drawn inside its rectangle.
    pub image_url: Option<String>,
    /// The stored tag of a `Custom` roof loaded with a type outside the
    /// catalog, written back on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

impl Roof {
    /// Instantiate a roof from its catalog template at the given position.
    pub fn from_template(kind: RoofKind, position: CanvasPoint) -> Self {
        let template = kind.template();
        Self {
            id: ItemId::new(),
            kind,
            position,
            size: template.size,
            rotation: 0.0,
            locked: false,
            color: template.color.to_string(),
            image_url: None,
            custom_type: None,
        }
    }

    /// Instantiate a roof from a stored type tag, keeping tags the catalog
    /// does not know.
    pub fn from_tag(tag: &str, position: CanvasPoint) -> Self {
        let kind = RoofKind::from_tag(tag);
        let mut roof = Self::from_template(kind, position);
        if kind == RoofKind::Custom && tag != RoofKind::Custom.to_string() {
            roof.custom_type = Some(tag.to_string());
        }
        roof
    }

    /// The type tag this roof is stored and summarized under.
    pub fn type_tag(&self) -> String {
        match (&self.kind, &self.custom_type) {
            (RoofKind::Custom, Some(tag)) => tag.clone(),
            _ => self.kind.to_string(),
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

    /// Merge the present fields of a patch into this roof.
    pub fn apply(&mut self, patch: &RoofPatch) {
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
        if let Some(kind) = patch.kind {
            self.kind = kind;
            self.custom_type = None;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = Some(image_url.clone());
        }
    }
}

/// A partial update for a [`Roof`]. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub locked: Option<bool>,
    pub kind: Option<RoofKind>,
    pub color: Option<String>,
    pub image_url: Option<String>,
}

impl RoofPatch {
    pub fn position(position: CanvasPoint) -> Self {
        Self {
            x: Some(position.x()),
            y: Some(position.y()),
            ..Default::default()
        }
    }
}
