//! Editing core for roof layouts.
//!
//! [`SceneStore`] owns the layout and its history, [`ToolController`] turns
//! pointer input into store operations, and [`Editor`] ties both to a
//! [`Keymap`].

mod config;
mod controller;
mod editor;
mod history;
mod keymap;
mod store;
mod tools;
mod viewport;

pub use config::EditorConfig;
pub use controller::{Gesture, ToolController};
pub use editor::{Editor, ROTATE_STEP, ZOOM_STEP};
pub use history::History;
pub use keymap::{EditorAction, KeyBinding, Keymap, Keystroke, KeystrokeParseError, Modifiers};
pub use store::{SceneStore, StoreEvent};
pub use tools::{tool_strip, Tool, ToolEntry};
pub use viewport::Viewport;
