//! The scene store: the live layout, its undo history and the editor's view state.
//!
//! Every mutation of the layout goes through [`SceneStore`]. Operations are
//! total: an unknown id or an operation with nothing to act on is a no-op and
//! records no history.

use crate::config::EditorConfig;
use crate::history::History;
use crate::tools::Tool;
use crate::viewport::Viewport;
use glam::Vec2;
use scene::{
    module_row, Annotation, CanvasDelta, CanvasPoint, CanvasSize, ItemId, ItemKind, Layout,
    Module, ModulePatch, Roof, RoofPatch, RowOrientation, ScreenPoint,
};
use std::collections::HashSet;

/// Notifications emitted to subscribers after the store changes.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    ItemAdded(ItemId),
    ItemRemoved(ItemId),
    SelectionChanged,
    /// Roofs, modules, annotations or the background changed.
    ContentChanged,
    /// Zoom, pan, grid or snap changed.
    ViewChanged,
    ToolChanged(Tool),
    /// A new document replaced the old one.
    LayoutReplaced,
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the current [`Layout`], the undo history and the view state.
pub struct SceneStore {
    layout: Layout,
    history: History,
    selection: HashSet<ItemId>,
    tool: Tool,
    drawing_color: String,
    line_width: f32,
    config: EditorConfig,
    listeners: Vec<Listener>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStore")
            .field("layout", &self.layout)
            .field("selection", &self.selection)
            .field("tool", &self.tool)
            .field("undo_depth", &self.history.undo_depth())
            .finish_non_exhaustive()
    }
}

impl SceneStore {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_layout(Layout::default(), config)
    }

    pub fn with_layout(mut layout: Layout, config: EditorConfig) -> Self {
        layout.sanitize();
        layout.canvas.zoom = config.clamp_zoom(layout.canvas.zoom);
        Self {
            layout,
            history: History::new(config.history_limit),
            selection: HashSet::new(),
            tool: Tool::default(),
            drawing_color: config.drawing_color.clone(),
            line_width: config.line_width,
            config,
            listeners: Vec::new(),
        }
    }

    /// Register a callback invoked synchronously after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: StoreEvent) {
        log::trace!("store event: {:?}", event);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn snapshot(&mut self) {
        self.history.push(self.layout.clone());
    }

    // === Queries ===

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &HashSet<ItemId> {
        &self.selection
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in z-order: roofs first, then modules.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.layout
            .roofs
            .iter()
            .map(|r| &r.id)
            .chain(self.layout.modules.iter().map(|m| &m.id))
            .filter(|id| self.selection.contains(*id))
            .cloned()
            .collect()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn drawing_color(&self) -> &str {
        &self.drawing_color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_canvas(&self.layout.canvas)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // === Modules ===

    /// Insert a fully specified module.
    pub fn add_module(&mut self, module: Module) {
        if self.layout.contains(&module.id) {
            log::debug!("add_module: id {} already present", module.id);
            return;
        }
        self.snapshot();
        let id = module.id.clone();
        self.layout.modules.push(module);
        self.emit(StoreEvent::ItemAdded(id));
        self.emit(StoreEvent::ContentChanged);
    }

    /// Merge fields into a module without recording history.
    ///
    /// Used for continuous feedback while dragging.
    pub fn update_module(&mut self, id: &ItemId, patch: &ModulePatch) {
        let Some(module) = self.layout.module_mut(id) else {
            return;
        };
        module.apply(patch);
        self.emit(StoreEvent::ContentChanged);
    }

    pub fn remove_module(&mut self, id: &ItemId) {
        let Some(index) = self.layout.modules.iter().position(|m| &m.id == id) else {
            return;
        };
        self.snapshot();
        self.layout.modules.remove(index);
        self.forget_selected(id);
        self.emit(StoreEvent::ItemRemoved(id.clone()));
        self.emit(StoreEvent::ContentChanged);
    }

    /// Clone a module with a fresh id, offset on both axes, and make the clone
    /// the only selected item.
    pub fn duplicate_module(&mut self, id: &ItemId) -> Option<ItemId> {
        let mut clone = self.layout.module(id)?.clone();
        clone.id = ItemId::new();
        let offset = self.config.duplicate_offset;
        clone.translate(CanvasDelta::new(offset, offset));
        let new_id = clone.id.clone();

        self.snapshot();
        self.layout.modules.push(clone);
        self.selection.clear();
        self.selection.insert(new_id.clone());
        self.emit(StoreEvent::ItemAdded(new_id.clone()));
        self.emit(StoreEvent::ContentChanged);
        self.emit(StoreEvent::SelectionChanged);
        Some(new_id)
    }

    /// Generate a row of `count` modules in one history step.
    pub fn add_module_row(
        &mut self,
        origin: CanvasPoint,
        count: usize,
        orientation: RowOrientation,
        spacing: f32,
        module_size: CanvasSize,
    ) -> Vec<ItemId> {
        if count == 0 {
            return Vec::new();
        }
        let row = module_row(origin, count, orientation, spacing, module_size);
        let ids: Vec<ItemId> = row.iter().map(|m| m.id.clone()).collect();

        self.snapshot();
        self.layout.modules.extend(row);
        log::debug!("added {} module row of {} modules", orientation, count);
        for id in &ids {
            self.emit(StoreEvent::ItemAdded(id.clone()));
        }
        self.emit(StoreEvent::ContentChanged);
        ids
    }

    // === Roofs ===

    /// Insert a fully specified roof.
    pub fn add_roof(&mut self, roof: Roof) {
        if self.layout.contains(&roof.id) {
            log::debug!("add_roof: id {} already present", roof.id);
            return;
        }
        self.snapshot();
        let id = roof.id.clone();
        self.layout.roofs.push(roof);
        self.emit(StoreEvent::ItemAdded(id));
        self.emit(StoreEvent::ContentChanged);
    }

    /// Merge fields into a roof without recording history.
    pub fn update_roof(&mut self, id: &ItemId, patch: &RoofPatch) {
        let Some(roof) = self.layout.roof_mut(id) else {
            return;
        };
        roof.apply(patch);
        self.emit(StoreEvent::ContentChanged);
    }

    pub fn remove_roof(&mut self, id: &ItemId) {
        let Some(index) = self.layout.roofs.iter().position(|r| &r.id == id) else {
            return;
        };
        self.snapshot();
        self.layout.roofs.remove(index);
        self.forget_selected(id);
        self.emit(StoreEvent::ItemRemoved(id.clone()));
        self.emit(StoreEvent::ContentChanged);
    }

    // === Annotations ===

    /// Append a committed annotation. Annotations with too few points are
    /// dropped.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        if !annotation.is_complete() {
            log::debug!(
                "discarding {} annotation with {} point(s)",
                annotation.kind,
                annotation.points.len()
            );
            return;
        }
        if self.layout.contains(&annotation.id) {
            return;
        }
        self.snapshot();
        let id = annotation.id.clone();
        self.layout.annotations.push(annotation);
        self.emit(StoreEvent::ItemAdded(id));
        self.emit(StoreEvent::ContentChanged);
    }

    /// Remove the most recently added annotation.
    pub fn remove_last_annotation(&mut self) -> Option<ItemId> {
        if self.layout.annotations.is_empty() {
            return None;
        }
        self.snapshot();
        let removed = self.layout.annotations.pop()?;
        self.emit(StoreEvent::ItemRemoved(removed.id.clone()));
        self.emit(StoreEvent::ContentChanged);
        Some(removed.id)
    }

    // === Selection commands ===

    /// Rotate every selected, unlocked roof and module. Locked items are skipped.
    ///
    /// Returns how many items rotated.
    pub fn rotate_selected(&mut self, delta_degrees: f32) -> usize {
        let targets: Vec<ItemId> = self
            .selected_ids()
            .into_iter()
            .filter(|id| !self.layout.is_locked(id))
            .collect();
        if targets.is_empty() {
            return 0;
        }

        self.snapshot();
        for id in &targets {
            if let Some(module) = self.layout.module_mut(id) {
                module.rotate_by(delta_degrees);
            } else if let Some(roof) = self.layout.roof_mut(id) {
                roof.rotate_by(delta_degrees);
            }
        }
        self.emit(StoreEvent::ContentChanged);
        targets.len()
    }

    /// Remove every selected item that is not locked. Locked items stay
    /// selected.
    pub fn delete_selected(&mut self) -> Vec<ItemId> {
        let selected = self.selected_ids();
        self.remove_items(&selected)
    }

    /// Remove the given roofs and modules in one history step. Locked and
    /// unknown ids are skipped. Returns the ids actually removed.
    pub fn remove_items(&mut self, ids: &[ItemId]) -> Vec<ItemId> {
        let targets: Vec<ItemId> = ids
            .iter()
            .filter(|id| {
                matches!(
                    self.layout.item_kind(id),
                    Some(ItemKind::Module) | Some(ItemKind::Roof)
                ) && !self.layout.is_locked(id)
            })
            .cloned()
            .collect();
        if targets.is_empty() {
            return targets;
        }

        self.snapshot();
        let doomed: HashSet<&ItemId> = targets.iter().collect();
        self.layout.modules.retain(|m| !doomed.contains(&m.id));
        self.layout.roofs.retain(|r| !doomed.contains(&r.id));
        for id in &targets {
            self.selection.remove(id);
        }
        for id in &targets {
            self.emit(StoreEvent::ItemRemoved(id.clone()));
        }
        self.emit(StoreEvent::ContentChanged);
        self.emit(StoreEvent::SelectionChanged);
        targets
    }

    /// Flip the locked flag on every selected item, locked or not.
    pub fn toggle_lock_selected(&mut self) {
        let targets = self.selected_ids();
        if targets.is_empty() {
            return;
        }

        self.snapshot();
        for id in &targets {
            if let Some(module) = self.layout.module_mut(id) {
                module.locked = !module.locked;
            } else if let Some(roof) = self.layout.roof_mut(id) {
                roof.locked = !roof.locked;
            }
        }
        self.emit(StoreEvent::ContentChanged);
    }

    // === Selection ===

    /// Replace the selection with `id`, or add it when `additive`.
    ///
    /// Only roofs and modules are selectable.
    pub fn select_item(&mut self, id: &ItemId, additive: bool) {
        match self.layout.item_kind(id) {
            Some(ItemKind::Module) | Some(ItemKind::Roof) => {}
            _ => return,
        }
        if !additive {
            self.selection.clear();
        }
        self.selection.insert(id.clone());
        self.emit(StoreEvent::SelectionChanged);
    }

    pub fn select_all(&mut self) {
        self.selection = self
            .layout
            .roofs
            .iter()
            .map(|r| r.id.clone())
            .chain(self.layout.modules.iter().map(|m| m.id.clone()))
            .collect();
        self.emit(StoreEvent::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    fn forget_selected(&mut self, id: &ItemId) {
        if self.selection.remove(id) {
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    /// Drop selected ids that no longer exist in the layout.
    fn prune_selection(&mut self) {
        let before = self.selection.len();
        let layout = &self.layout;
        self.selection
            .retain(|id| matches!(layout.item_kind(id), Some(ItemKind::Module | ItemKind::Roof)));
        if self.selection.len() != before {
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    // === History ===

    /// Restore the state before the last history-worthy mutation.
    ///
    /// Canvas view settings (zoom, pan, grid, snap) are kept as they are now.
    pub fn undo(&mut self) -> bool {
        let Some(mut previous) = self.history.undo(self.layout.clone()) else {
            return false;
        };
        previous.canvas = self.layout.canvas.clone();
        self.layout = previous;
        self.prune_selection();
        self.emit(StoreEvent::ContentChanged);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(mut next) = self.history.redo(self.layout.clone()) else {
            return false;
        };
        next.canvas = self.layout.canvas.clone();
        self.layout = next;
        self.prune_selection();
        self.emit(StoreEvent::ContentChanged);
        true
    }

    /// Record the current layout as an undo point ahead of changes made
    /// through the history-free update operations.
    ///
    /// The redo branch is set aside, not dropped, until the checkpoint is
    /// committed or another mutation is recorded.
    pub fn checkpoint(&mut self) {
        self.history.push_checkpoint(self.layout.clone());
    }

    /// Keep the open checkpoint as an ordinary undo step.
    pub fn commit_checkpoint(&mut self) {
        self.history.commit_checkpoint();
    }

    /// Return to the open checkpoint and discard it, restoring the redo
    /// branch. Does nothing if the checkpoint was already committed.
    pub fn rollback_checkpoint(&mut self) -> bool {
        let Some(mut previous) = self.history.rollback_checkpoint() else {
            return false;
        };
        previous.canvas = self.layout.canvas.clone();
        self.layout = previous;
        self.prune_selection();
        self.emit(StoreEvent::ContentChanged);
        true
    }

    // === Document ===

    /// Replace the document. History and selection start over.
    pub fn load_layout(&mut self, mut layout: Layout) {
        let repairs = layout.sanitize();
        if repairs > 0 {
            log::warn!("repaired {} problem(s) in loaded layout", repairs);
        }
        layout.canvas.zoom = self.config.clamp_zoom(layout.canvas.zoom);
        self.layout = layout;
        self.history.clear();
        self.selection.clear();
        self.emit(StoreEvent::LayoutReplaced);
        self.emit(StoreEvent::SelectionChanged);
    }

    /// Remove all roofs, modules, annotations and the background image.
    pub fn clear_layout(&mut self) {
        if self.layout.is_empty() && self.layout.background_image.is_none() {
            return;
        }
        self.snapshot();
        self.layout.roofs.clear();
        self.layout.modules.clear();
        self.layout.annotations.clear();
        self.layout.background_image = None;
        self.selection.clear();
        self.emit(StoreEvent::ContentChanged);
        self.emit(StoreEvent::SelectionChanged);
    }

    pub fn set_background_image(&mut self, image: Option<String>) {
        if self.layout.background_image == image {
            return;
        }
        self.snapshot();
        self.layout.background_image = image;
        self.emit(StoreEvent::ContentChanged);
    }

    // === View state ===

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.tool = tool;
            self.emit(StoreEvent::ToolChanged(tool));
        }
    }

    /// Set the zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.layout.canvas.zoom = self.config.clamp_zoom(zoom);
        self.emit(StoreEvent::ViewChanged);
    }

    /// Zoom by `factor`, keeping the canvas point under `screen_point` in place.
    pub fn zoom_at(&mut self, screen_point: ScreenPoint, factor: f32) {
        let mut viewport = self.viewport();
        let zoom = self.config.clamp_zoom(viewport.zoom * factor);
        viewport.zoom_to(screen_point, zoom);
        self.layout.canvas.zoom = viewport.zoom;
        self.layout.canvas.pan = viewport.pan;
        self.emit(StoreEvent::ViewChanged);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.layout.canvas.pan = pan;
        self.emit(StoreEvent::ViewChanged);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.layout.canvas.pan += delta;
        self.emit(StoreEvent::ViewChanged);
    }

    pub fn reset_view(&mut self) {
        self.layout.canvas.zoom = self.config.clamp_zoom(1.0);
        self.layout.canvas.pan = Vec2::ZERO;
        self.emit(StoreEvent::ViewChanged);
    }

    pub fn toggle_grid(&mut self) {
        self.layout.canvas.show_grid = !self.layout.canvas.show_grid;
        self.emit(StoreEvent::ViewChanged);
    }

    pub fn toggle_snap(&mut self) {
        self.layout.canvas.snap_to_grid = !self.layout.canvas.snap_to_grid;
        self.emit(StoreEvent::ViewChanged);
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        if size.width() > 0.0 && size.height() > 0.0 {
            self.layout.canvas.size = size;
            self.emit(StoreEvent::ViewChanged);
        }
    }

    pub fn set_drawing_color(&mut self, color: impl Into<String>) {
        self.drawing_color = color.into();
    }

    pub fn set_line_width(&mut self, width: f32) {
        if width > 0.0 && width.is_finite() {
            self.line_width = width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{AnnotationKind, RoofKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn module(x: f32, y: f32) -> Module {
        Module::new(CanvasPoint::new(x, y), CanvasSize::new(40.0, 60.0))
    }

    fn store_with_modules(n: usize) -> (SceneStore, Vec<ItemId>) {
        let mut store = SceneStore::default();
        let mut ids = Vec::new();
        for i in 0..n {
            let m = module(i as f32 * 100.0, 0.0);
            ids.push(m.id.clone());
            store.add_module(m);
        }
        (store, ids)
    }

    #[test]
    fn undo_and_redo_single_mutation() {
        let (mut store, _) = store_with_modules(1);
        let before = store.layout().clone();
        store.add_roof(Roof::from_template(RoofKind::Gable, CanvasPoint::new(0.0, 0.0)));
        let after = store.layout().clone();

        assert!(store.undo());
        assert_eq!(store.layout(), &before);
        assert!(store.redo());
        assert_eq!(store.layout(), &after);
    }

    #[test]
    fn undo_redo_at_boundaries_are_noops() {
        let mut store = SceneStore::default();
        assert!(!store.undo());
        assert!(!store.redo());
        store.add_module(module(0.0, 0.0));
        assert!(!store.redo());
        assert!(store.undo());
        assert!(!store.undo());
        assert!(store.layout().modules.is_empty());
    }

    #[test]
    fn update_does_not_record_history() {
        let (mut store, ids) = store_with_modules(1);
        assert!(store.undo());
        assert!(store.redo());
        store.update_module(&ids[0], &ModulePatch::position(CanvasPoint::new(5.0, 5.0)));
        assert_eq!(store.layout().modules[0].position, CanvasPoint::new(5.0, 5.0));
        // the only undo step is the original add
        assert!(store.undo());
        assert!(store.layout().modules.is_empty());
        assert!(!store.undo());
    }

    #[test]
    fn unknown_ids_are_noops() {
        let (mut store, _) = store_with_modules(1);
        let before = store.layout().clone();
        let ghost = ItemId::from("ghost");
        store.remove_module(&ghost);
        store.remove_roof(&ghost);
        store.update_module(&ghost, &ModulePatch::default());
        store.select_item(&ghost, false);
        assert!(store.duplicate_module(&ghost).is_none());
        assert_eq!(store.layout(), &before);
        assert!(store.selection().is_empty());
        // no extra undo steps were recorded
        assert!(store.undo());
        assert!(!store.undo());
    }

    #[test]
    fn remove_drops_selection() {
        let (mut store, ids) = store_with_modules(2);
        store.select_item(&ids[0], false);
        store.select_item(&ids[1], true);
        store.remove_module(&ids[0]);
        assert!(!store.is_selected(&ids[0]));
        assert!(store.is_selected(&ids[1]));
    }

    #[test]
    fn duplicate_offsets_and_selects_clone() {
        let (mut store, ids) = store_with_modules(1);
        store.update_module(
            &ids[0],
            &ModulePatch {
                rotation: Some(30.0),
                locked: Some(true),
                ..Default::default()
            },
        );
        store.select_item(&ids[0], false);
        let clone_id = store.duplicate_module(&ids[0]).unwrap();

        let original = store.layout().module(&ids[0]).unwrap().clone();
        let clone = store.layout().module(&clone_id).unwrap().clone();
        assert_ne!(clone.id, original.id);
        assert_eq!(clone.size, original.size);
        assert_eq!(clone.rotation, original.rotation);
        assert_eq!(clone.locked, original.locked);
        assert_eq!(clone.position.x() - original.position.x(), 20.0);
        assert_eq!(clone.position.y() - original.position.y(), 20.0);
        assert_eq!(store.selected_ids(), vec![clone_id]);
    }

    #[test]
    fn module_row_is_one_undo_step() {
        let mut store = SceneStore::default();
        let ids = store.add_module_row(
            CanvasPoint::new(0.0, 0.0),
            4,
            RowOrientation::Vertical,
            10.0,
            CanvasSize::new(40.0, 60.0),
        );
        assert_eq!(ids.len(), 4);
        assert_eq!(store.layout().modules[3].position, CanvasPoint::new(0.0, 210.0));
        assert!(store.undo());
        assert!(store.layout().modules.is_empty());
    }

    #[test]
    fn rotate_skips_locked_items() {
        let (mut store, ids) = store_with_modules(2);
        store.update_module(&ids[0], &ModulePatch { locked: Some(true), ..Default::default() });
        store.select_all();
        let locked_before = store.layout().module(&ids[0]).unwrap().clone();

        assert_eq!(store.rotate_selected(90.0), 1);
        assert_eq!(store.rotate_selected(90.0), 1);

        assert_eq!(store.layout().module(&ids[0]).unwrap(), &locked_before);
        assert_eq!(store.layout().module(&ids[1]).unwrap().rotation, 180.0);
    }

    #[test]
    fn rotation_stays_normalized() {
        let (mut store, ids) = store_with_modules(1);
        store.select_item(&ids[0], false);
        for delta in [-90.0, 725.0, -1080.5, 359.9, 0.1] {
            store.rotate_selected(delta);
            let rotation = store.layout().modules[0].rotation;
            assert!((0.0..360.0).contains(&rotation), "{rotation}");
        }
    }

    #[test]
    fn delete_keeps_locked_items_selected() {
        let (mut store, ids) = store_with_modules(2);
        store.select_item(&ids[0], false);
        store.select_item(&ids[1], true);
        store.toggle_lock_selected();
        store.select_item(&ids[1], false);
        store.toggle_lock_selected(); // unlock the second one again
        store.select_item(&ids[0], true);

        let removed = store.delete_selected();
        assert_eq!(removed, vec![ids[1].clone()]);
        assert!(store.layout().module(&ids[0]).is_some());
        assert!(store.layout().module(&ids[1]).is_none());
        assert_eq!(store.selected_ids(), vec![ids[0].clone()]);
    }

    #[test]
    fn remove_items_is_one_undo_step() {
        let (mut store, ids) = store_with_modules(3);
        let removed = store.remove_items(&[ids[0].clone(), ItemId::from("ghost"), ids[2].clone()]);
        assert_eq!(removed, vec![ids[0].clone(), ids[2].clone()]);
        assert_eq!(store.layout().modules.len(), 1);

        assert!(store.undo());
        assert_eq!(store.layout().modules.len(), 3);
    }

    #[test]
    fn toggle_lock_unlocks_locked_items() {
        let (mut store, ids) = store_with_modules(1);
        store.select_item(&ids[0], false);
        store.toggle_lock_selected();
        assert!(store.layout().modules[0].locked);
        store.toggle_lock_selected();
        assert!(!store.layout().modules[0].locked);
    }

    #[test]
    fn degenerate_annotation_is_absorbed() {
        let mut store = SceneStore::default();
        let dot = Annotation::begin(AnnotationKind::Line, CanvasPoint::new(1.0, 1.0), "#000000", 2.0);
        store.add_annotation(dot);
        assert!(store.layout().annotations.is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn remove_last_annotation() {
        let mut store = SceneStore::default();
        let mut first = Annotation::begin(AnnotationKind::Arrow, CanvasPoint::new(0.0, 0.0), "#000000", 2.0);
        first.extend_to(CanvasPoint::new(10.0, 0.0));
        let mut second = first.clone();
        second.id = ItemId::new();
        store.add_annotation(first.clone());
        store.add_annotation(second.clone());
        assert_eq!(store.remove_last_annotation(), Some(second.id));
        assert_eq!(store.layout().annotations, vec![first]);
    }

    #[test]
    fn undo_prunes_selection() {
        let mut store = SceneStore::default();
        let m = module(0.0, 0.0);
        let id = m.id.clone();
        store.add_module(m);
        store.select_item(&id, false);
        store.undo();
        assert!(store.selection().is_empty());
    }

    #[test]
    fn undo_keeps_view_settings() {
        let (mut store, _) = store_with_modules(1);
        store.set_zoom(2.0);
        store.toggle_grid();
        store.undo();
        assert_eq!(store.layout().canvas.zoom, 2.0);
        assert!(!store.layout().canvas.show_grid);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut store = SceneStore::default();
        store.set_zoom(10.0);
        assert_eq!(store.layout().canvas.zoom, 3.0);
        store.set_zoom(0.01);
        assert_eq!(store.layout().canvas.zoom, 0.25);
        store.zoom_at(ScreenPoint::new(100.0, 100.0), 100.0);
        assert_eq!(store.layout().canvas.zoom, 3.0);
    }

    #[test]
    fn checkpoint_rollback_leaves_no_trace() {
        let (mut store, ids) = store_with_modules(1);
        let before = store.layout().clone();
        store.checkpoint();
        store.update_module(&ids[0], &ModulePatch::position(CanvasPoint::new(300.0, 300.0)));
        assert!(store.rollback_checkpoint());
        assert_eq!(store.layout(), &before);
        assert!(!store.can_redo());
        // the add is still undoable
        assert!(store.undo());
        assert!(!store.can_undo());
    }

    #[test]
    fn rollback_restores_redo_branch() {
        let (mut store, ids) = store_with_modules(2);
        assert!(store.undo());
        assert!(store.can_redo());

        store.checkpoint();
        store.update_module(&ids[0], &ModulePatch::position(CanvasPoint::new(300.0, 300.0)));
        assert!(!store.can_redo());
        assert!(store.rollback_checkpoint());
        assert!(store.can_redo());
        assert!(store.redo());
        assert_eq!(store.layout().modules.len(), 2);
    }

    #[test]
    fn rollback_after_another_mutation_is_noop() {
        let (mut store, ids) = store_with_modules(1);
        store.checkpoint();
        store.update_module(&ids[0], &ModulePatch::position(CanvasPoint::new(300.0, 300.0)));
        store.set_background_image(Some("site.png".to_string()));

        assert!(!store.rollback_checkpoint());
        assert_eq!(store.layout().background_image.as_deref(), Some("site.png"));
        assert_eq!(store.layout().modules[0].position, CanvasPoint::new(300.0, 300.0));
    }

    #[test]
    fn load_layout_resets_history_and_selection() {
        let (mut store, ids) = store_with_modules(2);
        store.select_item(&ids[0], false);
        store.load_layout(Layout::new());
        assert!(!store.can_undo());
        assert!(store.selection().is_empty());
        assert!(store.layout().modules.is_empty());
    }

    #[test]
    fn background_image_is_undoable() {
        let mut store = SceneStore::default();
        store.set_background_image(Some("site.png".into()));
        store.set_background_image(Some("site.png".into()));
        assert!(store.undo());
        assert_eq!(store.layout().background_image, None);
        assert!(!store.can_undo());
    }

    #[test]
    fn subscribers_see_events() {
        let (mut store, ids) = store_with_modules(1);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        store.select_item(&ids[0], false);
        store.delete_selected();

        let events = events.borrow();
        assert!(events.contains(&StoreEvent::ItemRemoved(ids[0].clone())));
        assert!(events.contains(&StoreEvent::SelectionChanged));
        assert!(events.contains(&StoreEvent::ContentChanged));
    }
}
