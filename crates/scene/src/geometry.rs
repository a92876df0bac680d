//! Geometry shared by hit testing and painting.
//!
//! Both the tool controller and the renderer place a rotated rectangle through
//! [`RotatedRect::transform`], so a point reported inside by
//! [`RotatedRect::contains`] is always inside the rectangle as painted.

use crate::coords::{CanvasPoint, CanvasSize, LocalPoint};
use glam::{Affine2, Mat2, Vec2};

/// Normalize an angle in degrees to `[0, 360)`.
///
/// Non-finite input normalizes to zero.
pub fn normalize_rotation(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Round `value` to the nearest multiple of `grid_size`.
///
/// Ties round half away from zero. A non-positive grid size leaves the value
/// untouched.
pub fn snap_to_grid(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 || !grid_size.is_finite() {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(point: CanvasPoint, grid_size: f32) -> CanvasPoint {
    CanvasPoint::new(
        snap_to_grid(point.x(), grid_size),
        snap_to_grid(point.y(), grid_size),
    )
}

/// An axis-aligned rectangle rotated about its own center.
///
/// `position` is the top-left corner before rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    pub position: CanvasPoint,
    pub size: CanvasSize,
    /// Degrees, clockwise in screen space (y grows downward).
    pub rotation: f32,
}

impl RotatedRect {
    pub fn new(position: CanvasPoint, size: CanvasSize, rotation: f32) -> Self {
        Self {
            position,
            size,
            rotation,
        }
    }

    pub fn center(&self) -> CanvasPoint {
        CanvasPoint(self.position.0 + self.size.half_extents())
    }

    /// Maps local coordinates (origin at the center, unrotated) into canvas space.
    pub fn transform(&self) -> Affine2 {
        Affine2::from_angle_translation(self.rotation.to_radians(), self.center().0)
    }

    /// The rectangle in its local frame: top-left at minus half extents.
    pub fn local_bounds(&self) -> (Vec2, Vec2) {
        let half = self.size.half_extents();
        (-half, self.size.0)
    }

    /// Translate a canvas point into the rectangle's local frame.
    pub fn to_local(&self, point: CanvasPoint) -> LocalPoint {
        let offset = point.0 - self.center().0;
        LocalPoint(Mat2::from_angle(-self.rotation.to_radians()) * offset)
    }

    /// Whether the point lies inside the rotated rectangle (edges included).
    pub fn contains(&self, point: CanvasPoint) -> bool {
        let local = self.to_local(point);
        let half = self.size.half_extents();
        local.x().abs() <= half.x && local.y().abs() <= half.y
    }

    /// The four corners in canvas space, clockwise from the top-left.
    pub fn corners(&self) -> [CanvasPoint; 4] {
        let half = self.size.half_extents();
        let transform = self.transform();
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|corner| CanvasPoint(transform.transform_point2(corner)))
    }

    /// Axis-aligned bounding box of the rotated rectangle as (min, max).
    pub fn bounding_box(&self) -> (CanvasPoint, CanvasPoint) {
        let corners = self.corners();
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for corner in corners {
            min = min.min(corner.0);
            max = max.max(corner.0);
        }
        (CanvasPoint(min), CanvasPoint(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_stays_in_range() {
        for start in [-720.0, -360.0, -90.0, -0.0001, 0.0, 45.0, 359.9, 360.0, 725.0] {
            for delta in [-450.0, -90.0, 0.0, 90.0, 180.0, 271.5] {
                let r = normalize_rotation(start + delta);
                assert!((0.0..360.0).contains(&r), "{start} + {delta} -> {r}");
            }
        }
        assert_eq!(normalize_rotation(f32::NAN), 0.0);
        assert_eq!(normalize_rotation(-90.0), 270.0);
        assert_eq!(normalize_rotation(450.0), 90.0);
    }

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(snap_to_grid(105.0, 20.0), 100.0);
        assert_eq!(snap_to_grid(100.0, 20.0), 100.0);
        assert_eq!(snap_to_grid(111.0, 20.0), 120.0);
        assert_eq!(snap_to_grid(-9.0, 20.0), -0.0);
        assert_eq!(snap_to_grid(-11.0, 20.0), -20.0);
    }

    #[test]
    fn snap_ties_round_away_from_zero() {
        assert_eq!(snap_to_grid(110.0, 20.0), 120.0);
        assert_eq!(snap_to_grid(-110.0, 20.0), -120.0);
        assert_eq!(snap_to_grid(10.0, 20.0), 20.0);
    }

    #[test]
    fn snap_with_invalid_grid_is_identity() {
        assert_eq!(snap_to_grid(13.3, 0.0), 13.3);
        assert_eq!(snap_to_grid(13.3, -5.0), 13.3);
    }

    #[test]
    fn unrotated_contains() {
        let rect = RotatedRect::new(CanvasPoint::new(0.0, 0.0), CanvasSize::new(100.0, 50.0), 0.0);
        assert!(rect.contains(CanvasPoint::new(50.0, 25.0)));
        assert!(rect.contains(CanvasPoint::new(0.0, 0.0)));
        assert!(rect.contains(CanvasPoint::new(100.0, 50.0)));
        assert!(!rect.contains(CanvasPoint::new(-1.0, 25.0)));
        assert!(!rect.contains(CanvasPoint::new(50.0, 51.0)));
    }

    #[test]
    fn rotated_contains_follows_rotation() {
        // 100x20 bar centered at (50, 10); rotated 90 degrees it stands upright
        let rect = RotatedRect::new(CanvasPoint::new(0.0, 0.0), CanvasSize::new(100.0, 20.0), 90.0);
        assert!(rect.contains(CanvasPoint::new(50.0, 50.0)));
        assert!(rect.contains(CanvasPoint::new(50.0, -30.0)));
        assert!(!rect.contains(CanvasPoint::new(5.0, 10.0)));
        assert!(!rect.contains(CanvasPoint::new(95.0, 10.0)));
    }

    #[test]
    fn contains_agrees_with_transform() {
        for rotation in [0.0, 45.0, 90.0, 137.0, 270.0] {
            let rect =
                RotatedRect::new(CanvasPoint::new(30.0, 40.0), CanvasSize::new(60.0, 24.0), rotation);
            let inverse = rect.transform().inverse();
            let (min, size) = rect.local_bounds();
            for ix in -10..=10 {
                for iy in -10..=10 {
                    let p = CanvasPoint::new(60.0 + ix as f32 * 5.0, 52.0 + iy as f32 * 5.0);
                    if rect.contains(p) {
                        let local = inverse.transform_point2(p.0);
                        assert!(local.x >= min.x - 1e-3 && local.x <= min.x + size.x + 1e-3);
                        assert!(local.y >= min.y - 1e-3 && local.y <= min.y + size.y + 1e-3);
                    }
                }
            }
        }
    }

    #[test]
    fn bounding_box_of_quarter_turn() {
        let rect = RotatedRect::new(CanvasPoint::new(0.0, 0.0), CanvasSize::new(100.0, 20.0), 90.0);
        let (min, max) = rect.bounding_box();
        assert!((min.x() - 40.0).abs() < 1e-3);
        assert!((min.y() + 40.0).abs() < 1e-3);
        assert!((max.x() - 60.0).abs() < 1e-3);
        assert!((max.y() - 60.0).abs() < 1e-3);
    }
}
