//! Coordinate newtypes for layout geometry.
//!
//! Layout items are positioned in canvas units. Pointer events arrive in
//! surface pixels and go through the viewport before they touch the layout;
//! hit tests run in an item's own unrotated frame. Each of these gets its own
//! type so a screen position can't be stored as an item position.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

macro_rules! point_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name(pub Vec2);

        impl $name {
            pub fn new(x: f32, y: f32) -> Self {
                Self(Vec2::new(x, y))
            }

            pub fn x(&self) -> f32 {
                self.0.x
            }

            pub fn y(&self) -> f32 {
                self.0.y
            }
        }
    };
}

point_type! {
    /// A position on the layout, in canvas units. Stored item positions are
    /// top-left corners before rotation.
    CanvasPoint
}

point_type! {
    /// A pointer position on the drawing surface, in pixels.
    ScreenPoint
}

point_type! {
    /// A point relative to a rectangle's center with its rotation undone.
    LocalPoint
}

/// Width and height of a roof, module or the canvas itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }

    /// Center-to-edge distance on each axis.
    pub fn half_extents(&self) -> Vec2 {
        self.0 * 0.5
    }
}

/// An offset between two canvas positions: a drag, a duplicate nudge or the
/// pitch of a module row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

impl CanvasDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> CanvasPoint {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn sub(self, delta: CanvasDelta) -> CanvasPoint {
        CanvasPoint(self.0 - delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    fn sub(self, other: CanvasPoint) -> CanvasDelta {
        CanvasDelta(self.0 - other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grab_offset_round_trips() {
        let grab = CanvasPoint::new(130.0, 95.0);
        let item = CanvasPoint::new(100.0, 80.0);
        let offset = grab - item;
        assert_eq!(offset, CanvasDelta::new(30.0, 15.0));
        assert_eq!(grab - offset, item);
        assert_eq!(item + offset, grab);
    }

    #[test]
    fn module_half_extents() {
        assert_eq!(CanvasSize::new(40.0, 60.0).half_extents(), Vec2::new(20.0, 30.0));
    }
}
