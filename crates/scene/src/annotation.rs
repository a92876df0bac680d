use crate::coords::CanvasPoint;
use crate::ItemId;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The kind of a free-form annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnnotationKind {
    Line,
    Rectangle,
    Freehand,
    Arrow,
}

impl AnnotationKind {
    /// Fewest points a committed annotation of this kind may have.
    pub fn min_points(self) -> usize {
        2
    }

    /// Whether only the start and end points are kept while drawing.
    pub fn is_two_point(self) -> bool {
        !matches!(self, AnnotationKind::Freehand)
    }
}

/// A stroke drawn over the scene. Immutable once committed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: ItemId,
    pub kind: AnnotationKind,
    pub points: Vec<CanvasPoint>,
    /// Hex stroke color.
    pub color: String,
    pub line_width: f32,
}

impl Annotation {
    /// Begin a new annotation at `start`.
    pub fn begin(kind: AnnotationKind, start: CanvasPoint, color: impl Into<String>, line_width: f32) -> Self {
        Self {
            id: ItemId::new(),
            kind,
            points: vec![start],
            color: color.into(),
            line_width,
        }
    }

    /// Feed the next pointer position of an in-progress gesture.
    ///
    /// Two-point kinds keep the start and replace the end point; freehand
    /// appends every point.
    pub fn extend_to(&mut self, point: CanvasPoint) {
        if self.kind.is_two_point() {
            self.points.truncate(1);
        }
        self.points.push(point);
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.kind.min_points()
    }

    pub fn start(&self) -> Option<CanvasPoint> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<CanvasPoint> {
        self.points.last().copied()
    }
}
