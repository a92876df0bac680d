//! Roofplan commands - all operations that modify editor state.
//!
//! Commands are intent-based: they describe what the user wants,
//! not how to achieve it. The editor handles snapping, locking and
//! undo/redo recording.

use crate::Target;
use canvas::{EditorAction, Modifiers, Tool};
use glam::Vec2;
use scene::{ItemId, ModulePatch, RoofKind, RoofPatch, RowOrientation};
use serde::{Deserialize, Serialize};

/// A command that modifies editor state.
///
/// Commands are serializable for:
/// - Scripting layouts from the command line
/// - Recording and replaying sessions
/// - Driving the editor from tests
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Modules ===
    /// Add a module with its top-left corner at `position`.
    AddModule {
        position: Vec2,
        /// Defaults to the configured module size.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Vec2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<f32>,
    },

    /// Add `count` modules in a row, as one undo step.
    AddModuleRow {
        origin: Vec2,
        count: usize,
        #[serde(default)]
        orientation: RowOrientation,
        #[serde(default)]
        spacing: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Vec2>,
    },

    /// Patch one module. Does not record history on its own.
    UpdateModule { id: ItemId, patch: ModulePatch },

    /// Duplicate the target module, offset by the configured amount.
    Duplicate {
        #[serde(default)]
        target: Target,
    },

    // === Roofs ===
    /// Place a roof template centered in the visible canvas.
    PlaceRoof { kind: RoofKind },

    /// Add a roof template with its top-left corner at `position`.
    AddRoof { kind: RoofKind, position: Vec2 },

    /// Patch one roof. Does not record history on its own.
    UpdateRoof { id: ItemId, patch: RoofPatch },

    // === Items ===
    /// Remove target modules and roofs.
    Delete {
        #[serde(default)]
        target: Target,
    },

    /// Rotate the selection. Defaults to a quarter turn.
    Rotate {
        #[serde(default = "default_rotation")]
        degrees: f32,
    },

    /// Flip the lock flag on every selected item.
    ToggleLock,

    // === Selection ===
    /// Select items, optionally adding to the existing selection.
    Select {
        target: Target,
        #[serde(default)]
        add_to_selection: bool,
    },

    SelectAll,

    ClearSelection,

    // === Annotations ===
    SetDrawingColor { color: String },

    SetLineWidth { width: f32 },

    /// Remove the most recently drawn annotation.
    RemoveLastShape,

    // === History ===
    Undo,

    Redo,

    // === Canvas ===
    SetTool { tool: Tool },

    SetZoom { zoom: f32 },

    /// Zoom by `factor`, keeping the screen point under `anchor` fixed.
    ZoomAt { anchor: Vec2, factor: f32 },

    SetPan { pan: Vec2 },

    /// Pan by a screen-space delta.
    Pan { delta: Vec2 },

    ResetView,

    ToggleGrid,

    ToggleSnap,

    SetCanvasSize { width: f32, height: f32 },

    SetBackgroundImage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    /// Remove everything from the layout. Undoable.
    ClearLayout,

    // === Input ===
    /// Pointer pressed at a screen position.
    PointerDown {
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },

    PointerMove {
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },

    PointerUp {
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// A keystroke such as `"ctrl-z"`, dispatched through the keymap.
    Key { keystroke: String },

    /// Perform a named editor action directly.
    Action { action: EditorAction },

    // === Batch ===
    /// Execute multiple commands in order.
    Batch { commands: Vec<Command> },
}

fn default_rotation() -> f32 {
    canvas::ROTATE_STEP
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        /// IDs of items created, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<ItemId>,
        /// IDs of items modified, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ItemId>,
        /// IDs of items deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ItemId>,
    },
    /// Command failed.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn created(ids: Vec<ItemId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<ItemId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<ItemId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Fold another result into this one. The first error wins.
    pub fn merge(self, other: CommandResult) -> CommandResult {
        match (self, other) {
            (err @ Self::Error { .. }, _) => err,
            (_, err @ Self::Error { .. }) => err,
            (
                Self::Success {
                    mut created,
                    mut modified,
                    mut deleted,
                },
                Self::Success {
                    created: c,
                    modified: m,
                    deleted: d,
                },
            ) => {
                created.extend(c);
                modified.extend(m);
                deleted.extend(d);
                Self::Success {
                    created,
                    modified,
                    deleted,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_module_serializes_with_type_field() {
        let cmd = Command::AddModule {
            position: Vec2::new(100.0, 40.0),
            size: None,
            rotation: None,
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "add_module");
        // Vec2 serializes as [x, y] array
        assert_eq!(json["position"], serde_json::json!([100.0, 40.0]));
        assert!(json.get("size").is_none());
        assert!(json.get("rotation").is_none());
    }

    #[test]
    fn roof_kind_serializes_kebab_case() {
        let cmd = Command::PlaceRoof {
            kind: RoofKind::Gable,
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "place_roof");
        assert_eq!(json["kind"], "gable");
    }

    #[test]
    fn delete_defaults_to_selection() {
        let cmd: Command = serde_json::from_str(r#"{"type": "delete"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Delete {
                target: Target::Selection
            }
        );
    }

    #[test]
    fn rotate_defaults_to_quarter_turn() {
        let cmd: Command = serde_json::from_str(r#"{"type": "rotate"}"#).unwrap();
        assert_eq!(cmd, Command::Rotate { degrees: 90.0 });
    }

    #[test]
    fn pointer_events_take_partial_modifiers() {
        let json = r#"{"type": "pointer_down", "position": [10, 20], "modifiers": {"shift": true}}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        match cmd {
            Command::PointerDown { position, modifiers } => {
                assert_eq!(position, Vec2::new(10.0, 20.0));
                assert!(modifiers.shift);
                assert!(!modifiers.control);
            }
            _ => panic!("Expected PointerDown command"),
        }
    }

    #[test]
    fn update_module_deserializes_partial_patch() {
        let json = r#"{"type": "update_module", "id": "m-1", "patch": {"rotation": 45}}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            Command::UpdateModule {
                id: ItemId::from("m-1"),
                patch: ModulePatch {
                    rotation: Some(45.0),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn batch_command_contains_nested_commands() {
        let cmd = Command::Batch {
            commands: vec![Command::ClearSelection, Command::SelectAll],
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "batch");
        let commands = json["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["type"], "clear_selection");
        assert_eq!(commands[1]["type"], "select_all");
    }

    #[test]
    fn result_omits_empty_lists() {
        let json = serde_json::to_value(CommandResult::created(vec![ItemId::from("a")])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["created"], serde_json::json!(["a"]));
        assert!(json.get("deleted").is_none());
    }

    #[test]
    fn merge_keeps_first_error() {
        let merged = CommandResult::created(vec![ItemId::from("a")])
            .merge(CommandResult::deleted(vec![ItemId::from("b")]));
        assert_eq!(
            merged,
            CommandResult::Success {
                created: vec![ItemId::from("a")],
                modified: vec![],
                deleted: vec![ItemId::from("b")],
            }
        );
        let failed = CommandResult::error("first")
            .merge(CommandResult::error("second"))
            .merge(CommandResult::success());
        assert_eq!(failed, CommandResult::error("first"));
    }
}
