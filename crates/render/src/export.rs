use crate::pixmap::PixmapSurface;
use crate::renderer::{Frame, Renderer};
use crate::surface::SurfaceError;
use std::path::Path;

/// Rasterize a frame at the layout's canvas size and encode it as PNG.
///
/// Relative image references are resolved against `image_root` when given.
pub fn export_png(
    renderer: &Renderer,
    frame: &Frame,
    image_root: Option<&Path>,
) -> Result<Vec<u8>, SurfaceError> {
    let size = frame.layout.canvas.size;
    let width = size.width().round().max(0.0) as u32;
    let height = size.height().round().max(0.0) as u32;

    let mut surface = PixmapSurface::new(width, height)?;
    if let Some(root) = image_root {
        surface = surface.with_image_root(root);
    }
    renderer.render(&mut surface, frame);
    log::debug!("exported {}x{} frame", width, height);
    surface.encode_png()
}
