//! # Tool System
//!
//! The active [`Tool`] decides how pointer input on the canvas is interpreted.
//! Tools change only through explicit selection (toolbar or shortcut); the one
//! automatic switch is back to [`Tool::Select`] after a roof is placed.
//!
//! Roof placement and row generation are one-shot toolbar commands rather than
//! tools, so they have no pointer state of their own.

use scene::AnnotationKind;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(Default, Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
    /// Click to select, drag to move selected roofs and modules
    #[default]
    Select,
    /// Drag to move the view
    Pan,
    /// Click to drop a module at the (snapped) pointer position
    PlaceModule,
    /// Straight line between press and release
    DrawLine,
    /// Axis-aligned rectangle outline between press and release
    DrawRectangle,
    /// Freehand stroke following the pointer
    DrawFreehand,
    /// Line with an arrowhead at the release point
    DrawArrow,
}

impl Tool {
    /// The annotation kind a drawing tool produces.
    pub fn annotation_kind(self) -> Option<AnnotationKind> {
        match self {
            Tool::DrawLine => Some(AnnotationKind::Line),
            Tool::DrawRectangle => Some(AnnotationKind::Rectangle),
            Tool::DrawFreehand => Some(AnnotationKind::Freehand),
            Tool::DrawArrow => Some(AnnotationKind::Arrow),
            Tool::Select | Tool::Pan | Tool::PlaceModule => None,
        }
    }

    pub fn is_drawing(self) -> bool {
        self.annotation_kind().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Pan => "Pan",
            Tool::PlaceModule => "Place module",
            Tool::DrawLine => "Line",
            Tool::DrawRectangle => "Rectangle",
            Tool::DrawFreehand => "Freehand",
            Tool::DrawArrow => "Arrow",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tool::Select => "svg/arrow_pointer.svg",
            Tool::Pan => "svg/hand.svg",
            Tool::PlaceModule => "svg/solar_panel.svg",
            Tool::DrawLine => "svg/line_tool.svg",
            Tool::DrawRectangle => "svg/square.svg",
            Tool::DrawFreehand => "svg/pencil.svg",
            Tool::DrawArrow => "svg/arrow_tool.svg",
        }
    }
}

/// One button on the tool strip.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolEntry {
    Tool(Tool),
    /// Opens the roof catalog and places the chosen roof.
    PlaceRoof,
    /// Opens the row generator dialog.
    ModuleRow,
}

/// The tool strip, grouped the way it is displayed. Groups are separated by
/// dividers.
pub fn tool_strip() -> Vec<Vec<ToolEntry>> {
    vec![
        vec![ToolEntry::Tool(Tool::Select), ToolEntry::Tool(Tool::Pan)],
        vec![
            ToolEntry::PlaceRoof,
            ToolEntry::Tool(Tool::PlaceModule),
            ToolEntry::ModuleRow,
        ],
        vec![
            ToolEntry::Tool(Tool::DrawLine),
            ToolEntry::Tool(Tool::DrawRectangle),
            ToolEntry::Tool(Tool::DrawFreehand),
            ToolEntry::Tool(Tool::DrawArrow),
        ],
    ]
}
