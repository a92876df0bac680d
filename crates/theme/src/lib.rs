//! Minimal theming for the layout editor.
//!
//! Provides colors for the canvas background, grid, selection, roofs and
//! modules. Item colors stored in layouts are hex strings; [`parse_hex`]
//! turns them into [`Color`].

use palette::{FromColor, Hsla, Srgb, WithAlpha};

/// sRGB color with alpha, components in `0.0..=1.0`.
pub type Color = palette::Srgba;

/// Theme colors for the layout canvas.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Fill behind everything when no background image is drawn
    pub canvas_background: Color,

    /// Grid lines
    pub grid: Color,

    /// Selection accent (borders of selected roofs)
    pub selection: Color,

    /// Opacity applied to a roof's own fill color
    pub roof_fill_alpha: f32,

    /// Roof border when not selected
    pub roof_border: Color,

    /// Roof type label
    pub roof_label: Color,

    /// Module body, outer and inner tone
    pub module_fill: Color,
    pub module_fill_inner: Color,

    /// Module body when selected, outer and inner tone
    pub module_fill_selected: Color,
    pub module_fill_selected_inner: Color,

    /// Module frame
    pub module_border: Color,

    /// Lines between module cells
    pub module_cells: Color,

    /// Padlock glyph drawn on locked items
    pub lock: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            canvas_background: hsla(0.0, 0.0, 0.97, 1.0),
            grid: hsla(0.0, 0.0, 0.86, 1.0),
            selection: hsla(0.58, 0.9, 0.5, 1.0), // Blue
            roof_fill_alpha: 0.35,
            roof_border: hsla(0.0, 0.0, 0.25, 1.0),
            roof_label: hsla(0.0, 0.0, 0.15, 1.0),
            module_fill: hsla(0.61, 0.55, 0.22, 1.0),
            module_fill_inner: hsla(0.61, 0.5, 0.3, 1.0),
            module_fill_selected: hsla(0.58, 0.7, 0.4, 1.0),
            module_fill_selected_inner: hsla(0.58, 0.75, 0.5, 1.0),
            module_border: hsla(0.0, 0.0, 0.85, 1.0),
            module_cells: hsla(0.6, 0.3, 0.55, 0.6),
            lock: hsla(0.08, 0.9, 0.55, 1.0), // Orange
        }
    }

    pub fn dark() -> Self {
        Self {
            canvas_background: hsla(0.0, 0.0, 0.1, 1.0),
            grid: hsla(0.0, 0.0, 0.2, 1.0),
            selection: hsla(0.58, 0.9, 0.6, 1.0),
            roof_fill_alpha: 0.45,
            roof_border: hsla(0.0, 0.0, 0.7, 1.0),
            roof_label: hsla(0.0, 0.0, 0.9, 1.0),
            module_fill: hsla(0.61, 0.5, 0.25, 1.0),
            module_fill_inner: hsla(0.61, 0.45, 0.33, 1.0),
            module_fill_selected: hsla(0.58, 0.7, 0.45, 1.0),
            module_fill_selected_inner: hsla(0.58, 0.75, 0.55, 1.0),
            module_border: hsla(0.0, 0.0, 0.6, 1.0),
            module_cells: hsla(0.6, 0.3, 0.6, 0.5),
            lock: hsla(0.08, 0.9, 0.6, 1.0),
        }
    }

    /// Look up a built-in theme by name (`"light"` or `"dark"`).
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

/// Stroke colors offered by the annotation tools.
pub struct Palette;

impl Palette {
    pub const RED: &'static str = "#ef4444";
    pub const ORANGE: &'static str = "#f97316";
    pub const YELLOW: &'static str = "#eab308";
    pub const GREEN: &'static str = "#22c55e";
    pub const BLUE: &'static str = "#3b82f6";
    pub const BLACK: &'static str = "#111827";
    pub const WHITE: &'static str = "#ffffff";

    /// Returns all palette colors in order.
    pub fn all() -> [&'static str; 7] {
        [
            Self::RED,
            Self::ORANGE,
            Self::YELLOW,
            Self::GREEN,
            Self::BLUE,
            Self::BLACK,
            Self::WHITE,
        ]
    }
}

/// Helper to create a color from h, s, l, a values, hue in `0.0..1.0`.
pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Color {
    let hsla: Hsla = Hsla::new(h * 360.0, s, l, a);
    Color::from_color(hsla)
}

/// Parse `#rrggbb` or `#rgb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<Color> {
    let rgb: Srgb<u8> = hex.trim().parse().ok()?;
    Some(rgb.into_format::<f32>().with_alpha(1.0))
}

/// Parse a hex color, falling back when the string is not a valid color.
pub fn parse_hex_or(hex: &str, fallback: Color) -> Color {
    parse_hex(hex).unwrap_or(fallback)
}

/// The same color with its alpha replaced.
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    let mut color = color;
    color.alpha = alpha;
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_and_three_digit_hex() {
        let red = parse_hex("#ff0000").unwrap();
        assert!((red.red - 1.0).abs() < 1e-6);
        assert!(red.green.abs() < 1e-6);
        assert_eq!(red.alpha, 1.0);

        let white = parse_hex("fff").unwrap();
        assert!((white.blue - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex("not a color").is_none());
        let fallback = hsla(0.0, 0.0, 0.5, 1.0);
        assert_eq!(parse_hex_or("#zz0000", fallback), fallback);
    }

    #[test]
    fn hsla_grayscale() {
        let gray = hsla(0.0, 0.0, 0.5, 0.25);
        assert!((gray.red - 0.5).abs() < 1e-4);
        assert!((gray.green - 0.5).abs() < 1e-4);
        assert_eq!(gray.alpha, 0.25);
    }

    #[test]
    fn named_themes() {
        assert!(Theme::named("Dark").is_some());
        assert!(Theme::named("solarized").is_none());
    }

    #[test]
    fn palette_entries_parse() {
        for hex in Palette::all() {
            assert!(parse_hex(hex).is_some(), "{hex}");
        }
    }
}
