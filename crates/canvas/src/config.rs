use scene::CanvasSize;
use serde::{Deserialize, Serialize};
use theme::Palette;

/// Tunables for the editor core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Most undo snapshots kept; the oldest are dropped first.
    pub history_limit: usize,
    /// Size of modules created by the place-module tool and row generation.
    pub module_size: CanvasSize,
    /// Offset applied on both axes to a duplicated module.
    pub duplicate_offset: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Stroke color for new annotations.
    pub drawing_color: String,
    /// Stroke width for new annotations.
    pub line_width: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            module_size: CanvasSize::new(40.0, 60.0),
            duplicate_offset: 20.0,
            min_zoom: 0.25,
            max_zoom: 3.0,
            drawing_color: Palette::RED.to_string(),
            line_width: 2.0,
        }
    }
}

impl EditorConfig {
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        if !zoom.is_finite() {
            return 1.0_f32.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
