//! Scene model for the roof layout editor.
//!
//! A [`Layout`] holds roofs, solar modules and free-form annotations in flat
//! lists. Items render in z-order by collection (roofs, then annotations,
//! then modules) and by index within a collection.

pub mod annotation;
pub mod coords;
pub mod geometry;
mod item_id;
pub mod layout;
pub mod module;
pub mod roof;

pub use annotation::{Annotation, AnnotationKind};
pub use coords::{CanvasDelta, CanvasPoint, CanvasSize, LocalPoint, ScreenPoint};
pub use geometry::{normalize_rotation, snap_point, snap_to_grid, RotatedRect};
pub use item_id::ItemId;
pub use layout::{CanvasSettings, ItemKind, Layout, DEFAULT_GRID_SIZE, LAYOUT_VERSION, MIN_GRID_SIZE};
pub use module::{module_row, Module, ModulePatch, RowOrientation};
pub use roof::{Roof, RoofKind, RoofPatch, RoofTemplate};
