//! Pointer gestures on the layout canvas.
//!
//! The [`ToolController`] turns screen-space pointer events into store
//! operations according to the active [`Tool`]. It holds only the transient
//! state of the gesture in progress; everything durable lives in the
//! [`SceneStore`].

use crate::keymap::Modifiers;
use crate::store::SceneStore;
use crate::tools::Tool;
use glam::Vec2;
use scene::{
    snap_point, Annotation, CanvasDelta, CanvasPoint, ItemId, Module, ModulePatch, Roof,
    RoofKind, RoofPatch, ScreenPoint,
};

/// A pointer gesture between press and release.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    /// Moving the view
    Panning { last: ScreenPoint },
    /// Drawing a new annotation that is not yet part of the layout
    Drawing { annotation: Annotation },
    /// Moving the selected roofs and modules
    Dragging {
        /// The item under the pointer when the drag started
        grab_id: ItemId,
        /// Pointer position minus the grabbed item's top-left
        grab_offset: CanvasDelta,
        grab_start: CanvasPoint,
        start_positions: Vec<(ItemId, CanvasPoint)>,
        /// Whether an undo point was recorded for this drag
        checkpointed: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub struct ToolController {
    gesture: Option<Gesture>,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    /// The annotation being drawn, for painting before it is committed.
    pub fn in_progress_annotation(&self) -> Option<&Annotation> {
        match &self.gesture {
            Some(Gesture::Drawing { annotation }) => Some(annotation),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, store: &mut SceneStore, position: ScreenPoint, modifiers: Modifiers) {
        if self.gesture.is_some() {
            log::debug!("pointer down during a gesture, aborting the previous one");
            self.cancel(store);
        }

        let point = store.viewport().screen_to_canvas(position);
        match store.tool() {
            Tool::Pan => {
                self.gesture = Some(Gesture::Panning { last: position });
            }
            Tool::PlaceModule => {
                let canvas = &store.layout().canvas;
                let origin = if canvas.snap_to_grid {
                    snap_point(point, canvas.grid_size)
                } else {
                    point
                };
                let module = Module::new(origin, store.config().module_size);
                let id = module.id.clone();
                store.add_module(module);
                store.select_item(&id, false);
            }
            Tool::DrawLine | Tool::DrawRectangle | Tool::DrawFreehand | Tool::DrawArrow => {
                if let Some(kind) = store.tool().annotation_kind() {
                    let annotation =
                        Annotation::begin(kind, point, store.drawing_color(), store.line_width());
                    self.gesture = Some(Gesture::Drawing { annotation });
                }
            }
            Tool::Select => self.begin_select(store, point, modifiers),
        }
    }

    fn begin_select(&mut self, store: &mut SceneStore, point: CanvasPoint, modifiers: Modifiers) {
        let Some((_, id)) = store.layout().item_at(point) else {
            store.clear_selection();
            return;
        };

        let additive = modifiers.is_additive();
        if additive || !store.is_selected(&id) {
            store.select_item(&id, additive);
        }

        // Locked items can be selected (to unlock them) but never move.
        if store.layout().is_locked(&id) {
            return;
        }
        let Some(grab_start) = store.layout().item_position(&id) else {
            return;
        };

        let layout = store.layout();
        let start_positions = store
            .selected_ids()
            .into_iter()
            .filter(|id| !layout.is_locked(id))
            .filter_map(|id| layout.item_position(&id).map(|p| (id, p)))
            .collect();

        self.gesture = Some(Gesture::Dragging {
            grab_id: id,
            grab_offset: point - grab_start,
            grab_start,
            start_positions,
            checkpointed: false,
        });
    }

    pub fn pointer_move(&mut self, store: &mut SceneStore, position: ScreenPoint, _modifiers: Modifiers) {
        let point = store.viewport().screen_to_canvas(position);
        match &mut self.gesture {
            None => {}
            Some(Gesture::Panning { last }) => {
                let delta: Vec2 = position.0 - last.0;
                *last = position;
                store.pan_by(delta);
            }
            Some(Gesture::Drawing { annotation }) => {
                annotation.extend_to(point);
            }
            Some(Gesture::Dragging {
                grab_offset,
                grab_start,
                start_positions,
                checkpointed,
                ..
            }) => {
                let canvas = &store.layout().canvas;
                let mut target = point - *grab_offset;
                if canvas.snap_to_grid {
                    target = snap_point(target, canvas.grid_size);
                }
                let delta = target - *grab_start;

                let moves: Vec<(ItemId, CanvasPoint)> = start_positions
                    .iter()
                    .map(|(id, start)| (id.clone(), *start + delta))
                    .filter(|(id, to)| store.layout().item_position(id) != Some(*to))
                    .collect();
                if moves.is_empty() {
                    return;
                }

                if !*checkpointed {
                    store.checkpoint();
                    *checkpointed = true;
                }
                for (id, to) in moves {
                    if store.layout().module(&id).is_some() {
                        store.update_module(&id, &ModulePatch::position(to));
                    } else {
                        store.update_roof(&id, &RoofPatch::position(to));
                    }
                }
            }
        }
    }

    pub fn pointer_up(&mut self, store: &mut SceneStore, position: ScreenPoint, _modifiers: Modifiers) {
        let point = store.viewport().screen_to_canvas(position);
        match self.gesture.take() {
            Some(Gesture::Drawing { mut annotation }) => {
                if annotation.end() != Some(point) {
                    annotation.extend_to(point);
                }
                store.add_annotation(annotation);
            }
            Some(Gesture::Dragging {
                grab_id,
                checkpointed,
                ..
            }) => {
                if checkpointed {
                    store.commit_checkpoint();
                    log::debug!("finished dragging {}", grab_id);
                }
            }
            Some(Gesture::Panning { .. }) | None => {}
        }
    }

    /// Abort the current gesture without committing it.
    ///
    /// An in-progress annotation is discarded; a drag returns every moved
    /// item to where it started and leaves no undo entry.
    pub fn cancel(&mut self, store: &mut SceneStore) {
        match self.gesture.take() {
            Some(Gesture::Drawing { annotation }) => {
                log::debug!("discarded in-progress {} annotation", annotation.kind);
            }
            Some(Gesture::Dragging { checkpointed, .. }) => {
                if checkpointed {
                    store.rollback_checkpoint();
                }
            }
            Some(Gesture::Panning { .. }) | None => {}
        }
    }

    /// Place a catalog roof centered in the visible part of the canvas, then
    /// switch to the select tool with the new roof selected.
    pub fn place_roof(&mut self, store: &mut SceneStore, kind: RoofKind) -> ItemId {
        self.cancel(store);

        let canvas = &store.layout().canvas;
        let screen_center = ScreenPoint(canvas.size.0 / 2.0);
        let center = store.viewport().screen_to_canvas(screen_center);
        let template = kind.template();
        let mut origin = center - CanvasDelta(template.size.half_extents());
        if canvas.snap_to_grid {
            origin = snap_point(origin, canvas.grid_size);
        }

        let roof = Roof::from_template(kind, origin);
        let id = roof.id.clone();
        log::debug!("placing {} roof at {:?}", kind, origin);
        store.add_roof(roof);
        store.set_tool(Tool::Select);
        store.select_item(&id, false);
        id
    }
}
