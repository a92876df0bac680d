//! Painting for roof layouts.
//!
//! The [`Renderer`] draws through the [`DrawingSurface`] trait, so the same
//! paint routine feeds the on-screen canvas, PNG export ([`PixmapSurface`])
//! and tests ([`RecordingSurface`]).

mod export;
mod pixmap;
mod recording;
mod renderer;
mod surface;

pub use export::export_png;
pub use pixmap::PixmapSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{letterbox, Frame, Renderer};
pub use surface::{DrawingSurface, StrokeStyle, SurfaceError};
