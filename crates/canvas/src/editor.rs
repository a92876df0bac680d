//! The editor facade: a [`SceneStore`] driven by a [`ToolController`] and a
//! [`Keymap`].
//!
//! Front ends feed raw pointer and key events in here and read back the store
//! for painting.

use crate::config::EditorConfig;
use crate::controller::ToolController;
use crate::keymap::{EditorAction, Keymap, Keystroke, Modifiers};
use crate::store::SceneStore;
use crate::tools::Tool;
use scene::{ItemId, ItemKind, Layout, RoofKind, ScreenPoint};

/// Zoom step for the zoom in/out shortcuts.
pub const ZOOM_STEP: f32 = 1.2;

/// Rotation applied by the rotate shortcut, in degrees.
pub const ROTATE_STEP: f32 = 90.0;

#[derive(Debug)]
pub struct Editor {
    pub store: SceneStore,
    controller: ToolController,
    keymap: Keymap,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_layout(Layout::default(), config)
    }

    pub fn with_layout(layout: Layout, config: EditorConfig) -> Self {
        Self {
            store: SceneStore::with_layout(layout, config),
            controller: ToolController::new(),
            keymap: Keymap::with_defaults(),
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn controller(&self) -> &ToolController {
        &self.controller
    }

    /// Abort any gesture in progress. A drawing is discarded and a drag is
    /// rolled back.
    pub fn cancel_gesture(&mut self) {
        self.controller.cancel(&mut self.store);
    }

    /// Switch tools. Any gesture in progress is aborted first.
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel_gesture();
        self.store.set_tool(tool);
    }

    pub fn pointer_down(&mut self, position: ScreenPoint, modifiers: Modifiers) {
        self.controller.pointer_down(&mut self.store, position, modifiers);
    }

    pub fn pointer_move(&mut self, position: ScreenPoint, modifiers: Modifiers) {
        self.controller.pointer_move(&mut self.store, position, modifiers);
    }

    pub fn pointer_up(&mut self, position: ScreenPoint, modifiers: Modifiers) {
        self.controller.pointer_up(&mut self.store, position, modifiers);
    }

    /// Run the action bound to `keystroke`. Returns whether a binding matched.
    pub fn handle_key(&mut self, keystroke: &Keystroke) -> bool {
        match self.keymap.action_for(keystroke) {
            Some(action) => {
                log::trace!("{} -> {}", keystroke, action);
                self.perform(action);
                true
            }
            None => false,
        }
    }

    pub fn perform(&mut self, action: EditorAction) {
        match action {
            EditorAction::SelectTool => self.set_tool(Tool::Select),
            EditorAction::PanTool => self.set_tool(Tool::Pan),
            EditorAction::PlaceModuleTool => self.set_tool(Tool::PlaceModule),
            EditorAction::LineTool => self.set_tool(Tool::DrawLine),
            EditorAction::RectangleTool => self.set_tool(Tool::DrawRectangle),
            EditorAction::FreehandTool => self.set_tool(Tool::DrawFreehand),
            EditorAction::ArrowTool => self.set_tool(Tool::DrawArrow),
            EditorAction::Delete => {
                self.controller.cancel(&mut self.store);
                self.store.delete_selected();
            }
            EditorAction::Undo => {
                self.controller.cancel(&mut self.store);
                self.store.undo();
            }
            EditorAction::Redo => {
                self.controller.cancel(&mut self.store);
                self.store.redo();
            }
            EditorAction::RotateSelected => {
                self.controller.cancel(&mut self.store);
                self.store.rotate_selected(ROTATE_STEP);
            }
            EditorAction::Duplicate => {
                self.duplicate_selection();
            }
            EditorAction::ToggleLock => {
                self.controller.cancel(&mut self.store);
                self.store.toggle_lock_selected();
            }
            EditorAction::ToggleGrid => self.store.toggle_grid(),
            EditorAction::ToggleSnap => self.store.toggle_snap(),
            EditorAction::SelectAll => self.store.select_all(),
            EditorAction::Cancel => {
                self.controller.cancel(&mut self.store);
                self.store.clear_selection();
            }
            EditorAction::ZoomIn => self.zoom_about_center(ZOOM_STEP),
            EditorAction::ZoomOut => self.zoom_about_center(1.0 / ZOOM_STEP),
            EditorAction::ResetView => self.store.reset_view(),
            EditorAction::RemoveLastShape => {
                self.controller.cancel(&mut self.store);
                self.store.remove_last_annotation();
            }
        }
    }

    /// Duplicate the selected module. Does nothing unless exactly one module
    /// is selected.
    pub fn duplicate_selection(&mut self) -> Option<ItemId> {
        let selected = self.store.selected_ids();
        let [id] = selected.as_slice() else {
            return None;
        };
        if self.store.layout().item_kind(id) != Some(ItemKind::Module) {
            return None;
        }
        self.controller.cancel(&mut self.store);
        self.store.duplicate_module(id)
    }

    pub fn place_roof(&mut self, kind: RoofKind) -> ItemId {
        self.controller.place_roof(&mut self.store, kind)
    }

    fn zoom_about_center(&mut self, factor: f32) {
        let center = ScreenPoint(self.store.layout().canvas.size.0 / 2.0);
        self.store.zoom_at(center, factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{CanvasPoint, CanvasSize, Module};

    fn key(s: &str) -> Keystroke {
        s.parse().unwrap()
    }

    fn editor_with_two_modules() -> (Editor, ItemId, ItemId) {
        let mut editor = Editor::default();
        let a = Module::new(CanvasPoint::new(0.0, 0.0), CanvasSize::new(40.0, 60.0));
        let b = Module::new(CanvasPoint::new(100.0, 0.0), CanvasSize::new(40.0, 60.0));
        let (ida, idb) = (a.id.clone(), b.id.clone());
        editor.store.add_module(a);
        editor.store.add_module(b);
        (editor, ida, idb)
    }

    #[test]
    fn rotate_twice_with_shortcut() {
        let (mut editor, a, b) = editor_with_two_modules();
        editor.store.update_module(
            &a,
            &scene::ModulePatch {
                rotation: Some(270.0),
                ..Default::default()
            },
        );
        editor.store.select_item(&a, false);
        editor.store.select_item(&b, true);

        assert!(editor.handle_key(&key("shift-r")));
        assert!(editor.handle_key(&key("shift-r")));

        assert_eq!(editor.store.layout().module(&a).unwrap().rotation, 90.0);
        assert_eq!(editor.store.layout().module(&b).unwrap().rotation, 180.0);
    }

    #[test]
    fn delete_leaves_locked_module_selected() {
        let (mut editor, a, b) = editor_with_two_modules();
        editor.store.select_item(&a, false);
        editor.perform(EditorAction::ToggleLock);
        editor.store.select_item(&b, true);

        assert!(editor.handle_key(&key("delete")));

        assert!(editor.store.layout().module(&a).is_some());
        assert!(editor.store.layout().module(&b).is_none());
        assert_eq!(editor.store.selected_ids(), vec![a]);
    }

    #[test]
    fn duplicate_needs_exactly_one_module() {
        let (mut editor, a, b) = editor_with_two_modules();
        editor.store.select_all();
        assert!(editor.duplicate_selection().is_none());

        editor.store.select_item(&b, false);
        let clone = editor.duplicate_selection().unwrap();
        assert_eq!(editor.store.selected_ids(), vec![clone]);
        assert_eq!(editor.store.layout().modules.len(), 3);
        assert!(editor.store.layout().module(&a).is_some());
    }

    #[test]
    fn tool_switch_aborts_drawing() {
        let mut editor = Editor::default();
        editor.handle_key(&key("l"));
        assert_eq!(editor.store.tool(), Tool::DrawLine);

        editor.pointer_down(ScreenPoint::new(0.0, 0.0), Modifiers::none());
        editor.pointer_move(ScreenPoint::new(80.0, 0.0), Modifiers::none());
        editor.handle_key(&key("v"));
        editor.pointer_up(ScreenPoint::new(80.0, 0.0), Modifiers::none());

        assert_eq!(editor.store.tool(), Tool::Select);
        assert!(editor.store.layout().annotations.is_empty());
    }

    #[test]
    fn undo_shortcuts() {
        let (mut editor, _, _) = editor_with_two_modules();
        assert!(editor.handle_key(&key("cmd-z")));
        assert_eq!(editor.store.layout().modules.len(), 1);
        assert!(editor.handle_key(&key("ctrl-shift-z")));
        assert_eq!(editor.store.layout().modules.len(), 2);
        assert!(!editor.handle_key(&key("ctrl-q")));
    }

    #[test]
    fn zoom_shortcuts_stay_in_range() {
        let mut editor = Editor::default();
        for _ in 0..20 {
            editor.perform(EditorAction::ZoomIn);
        }
        assert_eq!(editor.store.layout().canvas.zoom, 3.0);
        editor.perform(EditorAction::ResetView);
        assert_eq!(editor.store.layout().canvas.zoom, 1.0);
    }

    #[test]
    fn escape_clears_selection() {
        let (mut editor, a, _) = editor_with_two_modules();
        editor.store.select_item(&a, false);
        editor.handle_key(&key("escape"));
        assert!(editor.store.selection().is_empty());
    }
}
