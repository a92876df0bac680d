//! Roofplan queries - read-only access to editor state.
//!
//! Queries allow inspecting the layout without modifying it.
//! Scripts use them to check state before issuing commands.

use crate::Target;
use glam::Vec2;
use interchange::{Document, Summary};
use scene::{Annotation, ItemId, Module, Roof};
use serde::{Deserialize, Serialize};

/// A query for editor state (read-only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Get the current selection.
    GetSelection,

    /// Get modules and roofs matching a target.
    GetItems {
        #[serde(default)]
        target: Target,
    },

    /// Get all annotations.
    GetAnnotations,

    /// Get the module count and primary roof type.
    GetSummary,

    /// Get the whole layout as a stored document.
    GetDocument,

    /// Get the bounding box of all modules and roofs.
    GetBounds,

    /// Get the current viewport state.
    GetViewport,

    /// Get the current tool.
    GetTool,

    /// Get undo/redo availability.
    GetHistory,
}

/// Response to a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Selection { ids: Vec<ItemId> },

    Items { roofs: Vec<Roof>, modules: Vec<Module> },

    Annotations { annotations: Vec<Annotation> },

    Summary {
        #[serde(flatten)]
        summary: Summary,
    },

    Document { document: Document },

    Bounds { min: Option<Vec2>, max: Option<Vec2> },

    Viewport { pan: Vec2, zoom: f32 },

    Tool { tool: String },

    History { can_undo: bool, can_redo: bool },

    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_deserializes_with_default_target() {
        let query: Query = serde_json::from_str(r#"{"type": "get_items"}"#).unwrap();
        assert_eq!(
            query,
            Query::GetItems {
                target: Target::Selection
            }
        );
    }

    #[test]
    fn summary_result_is_flat() {
        let result = QueryResult::Summary {
            summary: Summary {
                module_count: 3,
                roof_type: Some("hip".into()),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "summary");
        assert_eq!(json["moduleCount"], 3);
        assert_eq!(json["roofType"], "hip");
    }
}
