//! Command and query execution against an Editor.
//!
//! This module connects the abstract Command/Query types to the editor,
//! executing operations and returning results.

use crate::{Command, CommandResult, Query, QueryResult, Target};
use canvas::{Editor, Keystroke};
use glam::Vec2;
use interchange::{Document, Summary};
use scene::{CanvasPoint, CanvasSize, ItemId, ItemKind, Module, Roof, ScreenPoint};

/// Execute a command against an editor.
pub fn execute_command(editor: &mut Editor, command: Command) -> CommandResult {
    log::trace!("executing {:?}", command);
    match command {
        Command::AddModule {
            position,
            size,
            rotation,
        } => {
            let size = size
                .map(CanvasSize)
                .unwrap_or(editor.store.config().module_size);
            if size.width() <= 0.0 || size.height() <= 0.0 {
                return CommandResult::error("module size must be positive");
            }
            editor.cancel_gesture();
            let mut module = Module::new(CanvasPoint(position), size);
            if let Some(rotation) = rotation {
                module.rotate_by(rotation);
            }
            let id = module.id.clone();
            editor.store.add_module(module);
            CommandResult::created(vec![id])
        }

        Command::AddModuleRow {
            origin,
            count,
            orientation,
            spacing,
            size,
        } => {
            let size = size
                .map(CanvasSize)
                .unwrap_or(editor.store.config().module_size);
            editor.cancel_gesture();
            let ids = editor
                .store
                .add_module_row(CanvasPoint(origin), count, orientation, spacing, size);
            CommandResult::created(ids)
        }

        Command::UpdateModule { id, patch } => {
            if editor.store.layout().module(&id).is_none() {
                return CommandResult::error(format!("no module with id {}", id));
            }
            editor.cancel_gesture();
            editor.store.update_module(&id, &patch);
            CommandResult::modified(vec![id])
        }

        Command::Duplicate { target } => {
            let modules: Vec<ItemId> = target
                .resolve(&editor.store)
                .into_iter()
                .filter(|id| editor.store.layout().item_kind(id) == Some(ItemKind::Module))
                .collect();
            editor.cancel_gesture();
            let created = modules
                .iter()
                .filter_map(|id| editor.store.duplicate_module(id))
                .collect();
            CommandResult::created(created)
        }

        Command::PlaceRoof { kind } => CommandResult::created(vec![editor.place_roof(kind)]),

        Command::AddRoof { kind, position } => {
            editor.cancel_gesture();
            let roof = Roof::from_template(kind, CanvasPoint(position));
            let id = roof.id.clone();
            editor.store.add_roof(roof);
            CommandResult::created(vec![id])
        }

        Command::UpdateRoof { id, patch } => {
            if editor.store.layout().roof(&id).is_none() {
                return CommandResult::error(format!("no roof with id {}", id));
            }
            editor.cancel_gesture();
            editor.store.update_roof(&id, &patch);
            CommandResult::modified(vec![id])
        }

        Command::Delete { target } => {
            let ids = target.resolve(&editor.store);
            editor.cancel_gesture();
            CommandResult::deleted(editor.store.remove_items(&ids))
        }

        Command::Rotate { degrees } => {
            editor.cancel_gesture();
            let rotated: Vec<ItemId> = editor
                .store
                .selected_ids()
                .into_iter()
                .filter(|id| !editor.store.layout().is_locked(id))
                .collect();
            editor.store.rotate_selected(degrees);
            CommandResult::modified(rotated)
        }

        Command::ToggleLock => {
            editor.cancel_gesture();
            let ids = editor.store.selected_ids();
            editor.store.toggle_lock_selected();
            CommandResult::modified(ids)
        }

        Command::Select {
            target,
            add_to_selection,
        } => {
            editor.cancel_gesture();
            let ids = target.resolve(&editor.store);
            if !add_to_selection {
                editor.store.clear_selection();
            }
            for id in &ids {
                editor.store.select_item(id, true);
            }
            CommandResult::success()
        }

        Command::SelectAll => {
            editor.cancel_gesture();
            editor.store.select_all();
            CommandResult::success()
        }

        Command::ClearSelection => {
            editor.cancel_gesture();
            editor.store.clear_selection();
            CommandResult::success()
        }

        Command::SetDrawingColor { color } => {
            editor.store.set_drawing_color(color);
            CommandResult::success()
        }

        Command::SetLineWidth { width } => {
            if width <= 0.0 {
                return CommandResult::error("line width must be positive");
            }
            editor.store.set_line_width(width);
            CommandResult::success()
        }

        Command::RemoveLastShape => {
            editor.cancel_gesture();
            match editor.store.remove_last_annotation() {
                Some(id) => CommandResult::deleted(vec![id]),
                None => CommandResult::success(),
            }
        }

        // At either end of the history these are no-ops; GetHistory reports
        // whether a step is available.
        Command::Undo => {
            editor.cancel_gesture();
            if !editor.store.undo() {
                log::debug!("nothing to undo");
            }
            CommandResult::success()
        }

        Command::Redo => {
            editor.cancel_gesture();
            if !editor.store.redo() {
                log::debug!("nothing to redo");
            }
            CommandResult::success()
        }

        Command::SetTool { tool } => {
            editor.set_tool(tool);
            CommandResult::success()
        }

        Command::SetZoom { zoom } => {
            editor.store.set_zoom(zoom);
            CommandResult::success()
        }

        Command::ZoomAt { anchor, factor } => {
            if factor <= 0.0 {
                return CommandResult::error("zoom factor must be positive");
            }
            editor.store.zoom_at(ScreenPoint(anchor), factor);
            CommandResult::success()
        }

        Command::SetPan { pan } => {
            editor.store.set_pan(pan);
            CommandResult::success()
        }

        Command::Pan { delta } => {
            editor.store.pan_by(delta);
            CommandResult::success()
        }

        Command::ResetView => {
            editor.store.reset_view();
            CommandResult::success()
        }

        Command::ToggleGrid => {
            editor.store.toggle_grid();
            CommandResult::success()
        }

        Command::ToggleSnap => {
            editor.store.toggle_snap();
            CommandResult::success()
        }

        Command::SetCanvasSize { width, height } => {
            if width <= 0.0 || height <= 0.0 {
                return CommandResult::error("canvas size must be positive");
            }
            editor.store.set_canvas_size(CanvasSize::new(width, height));
            CommandResult::success()
        }

        Command::SetBackgroundImage { url } => {
            editor.cancel_gesture();
            editor.store.set_background_image(url);
            CommandResult::success()
        }

        Command::ClearLayout => {
            editor.cancel_gesture();
            let removed = Target::All.resolve(&editor.store);
            editor.store.clear_layout();
            CommandResult::deleted(removed)
        }

        Command::PointerDown {
            position,
            modifiers,
        } => track_created(editor, |editor| {
            editor.pointer_down(ScreenPoint(position), modifiers)
        }),

        Command::PointerMove {
            position,
            modifiers,
        } => {
            editor.pointer_move(ScreenPoint(position), modifiers);
            CommandResult::success()
        }

        Command::PointerUp {
            position,
            modifiers,
        } => track_created(editor, |editor| {
            editor.pointer_up(ScreenPoint(position), modifiers)
        }),

        Command::Key { keystroke } => match keystroke.parse::<Keystroke>() {
            Ok(keystroke) => {
                if editor.handle_key(&keystroke) {
                    CommandResult::success()
                } else {
                    CommandResult::error(format!("no binding for {}", keystroke))
                }
            }
            Err(e) => CommandResult::error(format!("invalid keystroke: {}", e)),
        },

        Command::Action { action } => {
            editor.perform(action);
            CommandResult::success()
        }

        Command::Batch { commands } => {
            let mut result = CommandResult::success();
            for cmd in commands {
                result = result.merge(execute_command(editor, cmd));
                if result.is_error() {
                    break;
                }
            }
            result
        }
    }
}

/// Run an input event and report any items it added to the layout.
fn track_created(editor: &mut Editor, event: impl FnOnce(&mut Editor)) -> CommandResult {
    let before = all_item_ids(editor);
    event(editor);
    let created = all_item_ids(editor)
        .into_iter()
        .filter(|id| !before.contains(id))
        .collect();
    CommandResult::created(created)
}

fn all_item_ids(editor: &Editor) -> Vec<ItemId> {
    let layout = editor.store.layout();
    layout
        .roofs
        .iter()
        .map(|r| r.id.clone())
        .chain(layout.annotations.iter().map(|a| a.id.clone()))
        .chain(layout.modules.iter().map(|m| m.id.clone()))
        .collect()
}

/// Execute a query against an editor.
pub fn execute_query(editor: &Editor, query: Query) -> QueryResult {
    let store = &editor.store;
    let layout = store.layout();
    match query {
        Query::GetSelection => QueryResult::Selection {
            ids: store.selected_ids(),
        },

        Query::GetItems { target } => {
            let ids = target.resolve(store);
            QueryResult::Items {
                roofs: layout
                    .roofs
                    .iter()
                    .filter(|r| ids.contains(&r.id))
                    .cloned()
                    .collect(),
                modules: layout
                    .modules
                    .iter()
                    .filter(|m| ids.contains(&m.id))
                    .cloned()
                    .collect(),
            }
        }

        Query::GetAnnotations => QueryResult::Annotations {
            annotations: layout.annotations.clone(),
        },

        Query::GetSummary => QueryResult::Summary {
            summary: Summary::of(layout),
        },

        Query::GetDocument => QueryResult::Document {
            document: Document::from_layout(layout),
        },

        Query::GetBounds => {
            let rects = layout
                .roofs
                .iter()
                .map(Roof::rect)
                .chain(layout.modules.iter().map(Module::rect));

            let mut bounds: Option<(Vec2, Vec2)> = None;
            for rect in rects {
                let (min, max) = rect.bounding_box();
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(min.0), hi.max(max.0)),
                    None => (min.0, max.0),
                });
            }

            QueryResult::Bounds {
                min: bounds.map(|b| b.0),
                max: bounds.map(|b| b.1),
            }
        }

        Query::GetViewport => {
            let viewport = store.viewport();
            QueryResult::Viewport {
                pan: viewport.pan,
                zoom: viewport.zoom,
            }
        }

        Query::GetTool => QueryResult::Tool {
            tool: store.tool().to_string(),
        },

        Query::GetHistory => QueryResult::History {
            can_undo: store.can_undo(),
            can_redo: store.can_redo(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::{Modifiers, Tool};
    use scene::{ModulePatch, RoofKind};

    fn created(result: &CommandResult) -> Vec<ItemId> {
        match result {
            CommandResult::Success { created, .. } => created.clone(),
            CommandResult::Error { message } => panic!("command failed: {}", message),
        }
    }

    #[test]
    fn add_module_uses_configured_size() {
        let mut editor = Editor::default();
        let result = execute_command(
            &mut editor,
            Command::AddModule {
                position: Vec2::new(100.0, 100.0),
                size: None,
                rotation: Some(450.0),
            },
        );
        let ids = created(&result);
        let module = editor.store.layout().module(&ids[0]).unwrap();
        assert_eq!(module.size, CanvasSize::new(40.0, 60.0));
        assert_eq!(module.rotation, 90.0);
    }

    #[test]
    fn update_unknown_module_is_an_error() {
        let mut editor = Editor::default();
        let result = execute_command(
            &mut editor,
            Command::UpdateModule {
                id: ItemId::from("ghost"),
                patch: ModulePatch::default(),
            },
        );
        assert!(result.is_error());
    }

    #[test]
    fn delete_by_target_skips_locked() {
        let mut editor = Editor::default();
        let ids = created(&execute_command(
            &mut editor,
            Command::AddModuleRow {
                origin: Vec2::ZERO,
                count: 3,
                orientation: Default::default(),
                spacing: 5.0,
                size: None,
            },
        ));
        execute_command(
            &mut editor,
            Command::UpdateModule {
                id: ids[1].clone(),
                patch: ModulePatch {
                    locked: Some(true),
                    ..Default::default()
                },
            },
        );

        let result = execute_command(&mut editor, Command::Delete { target: Target::Modules });
        assert_eq!(result, CommandResult::deleted(vec![ids[0].clone(), ids[2].clone()]));
        assert_eq!(editor.store.layout().modules.len(), 1);
    }

    #[test]
    fn pointer_click_reports_placed_module() {
        let mut editor = Editor::default();
        execute_command(&mut editor, Command::SetTool { tool: Tool::PlaceModule });
        let result = execute_command(
            &mut editor,
            Command::PointerDown {
                position: Vec2::new(205.0, 98.0),
                modifiers: Modifiers::none(),
            },
        );
        let ids = created(&result);
        assert_eq!(ids.len(), 1);
        assert_eq!(
            editor.store.layout().module(&ids[0]).unwrap().position,
            CanvasPoint::new(200.0, 100.0)
        );
    }

    #[test]
    fn batch_stops_at_first_error() {
        let mut editor = Editor::default();
        let result = execute_command(
            &mut editor,
            Command::Batch {
                commands: vec![
                    Command::PlaceRoof {
                        kind: RoofKind::Hip,
                    },
                    Command::Redo,
                    Command::UpdateRoof {
                        id: ItemId::from("missing"),
                        patch: Default::default(),
                    },
                    Command::ToggleGrid,
                ],
            },
        );
        assert_eq!(result, CommandResult::error("no roof with id missing"));
        assert_eq!(editor.store.layout().roofs.len(), 1);
        assert!(editor.store.layout().canvas.show_grid);
    }

    #[test]
    fn undo_and_redo_at_the_ends_succeed() {
        let mut editor = Editor::default();
        assert!(!execute_command(&mut editor, Command::Undo).is_error());
        assert!(!execute_command(&mut editor, Command::Redo).is_error());
        assert_eq!(
            execute_query(&editor, Query::GetHistory),
            QueryResult::History {
                can_undo: false,
                can_redo: false,
            }
        );
    }

    #[test]
    fn content_commands_abort_a_drag() {
        let mut editor = Editor::default();
        let id = created(&execute_command(
            &mut editor,
            Command::AddModule {
                position: Vec2::ZERO,
                size: None,
                rotation: None,
            },
        ))[0]
            .clone();
        execute_command(
            &mut editor,
            Command::PointerDown {
                position: Vec2::new(10.0, 10.0),
                modifiers: Modifiers::none(),
            },
        );
        execute_command(
            &mut editor,
            Command::PointerMove {
                position: Vec2::new(110.0, 110.0),
                modifiers: Modifiers::none(),
            },
        );
        execute_command(
            &mut editor,
            Command::SetBackgroundImage {
                url: Some("site.png".into()),
            },
        );
        execute_command(&mut editor, Command::Key { keystroke: "escape".into() });

        let layout = editor.store.layout();
        assert_eq!(layout.module(&id).unwrap().position, CanvasPoint::new(0.0, 0.0));
        assert_eq!(layout.background_image.as_deref(), Some("site.png"));

        // one undo removes the background, one more removes the module
        assert!(editor.store.undo());
        assert_eq!(editor.store.layout().background_image, None);
        assert!(editor.store.undo());
        assert!(!editor.store.can_undo());
    }

    #[test]
    fn key_commands_go_through_the_keymap() {
        let mut editor = Editor::default();
        execute_command(
            &mut editor,
            Command::AddRoof {
                kind: RoofKind::Flat,
                position: Vec2::ZERO,
            },
        );
        assert!(!execute_command(&mut editor, Command::Key { keystroke: "ctrl-z".into() }).is_error());
        assert!(editor.store.layout().roofs.is_empty());
        assert!(execute_command(&mut editor, Command::Key { keystroke: "f13".into() }).is_error());
    }

    #[test]
    fn queries_report_state() {
        let mut editor = Editor::default();
        let roof = created(&execute_command(
            &mut editor,
            Command::AddRoof {
                kind: RoofKind::Gable,
                position: Vec2::new(10.0, 20.0),
            },
        ));
        execute_command(&mut editor, Command::Select { target: Target::All, add_to_selection: false });

        assert_eq!(
            execute_query(&editor, Query::GetSelection),
            QueryResult::Selection { ids: roof.clone() }
        );
        assert_eq!(
            execute_query(&editor, Query::GetBounds),
            QueryResult::Bounds {
                min: Some(Vec2::new(10.0, 20.0)),
                max: Some(Vec2::new(410.0, 260.0)),
            }
        );
        assert_eq!(
            execute_query(&editor, Query::GetTool),
            QueryResult::Tool {
                tool: "select".into()
            }
        );
        assert_eq!(
            execute_query(&editor, Query::GetHistory),
            QueryResult::History {
                can_undo: true,
                can_redo: false
            }
        );
    }

    #[test]
    fn empty_layout_has_no_bounds() {
        let editor = Editor::default();
        assert_eq!(
            execute_query(&editor, Query::GetBounds),
            QueryResult::Bounds { min: None, max: None }
        );
    }
}
