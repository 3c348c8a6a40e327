// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The oriented rectangle shared by bundles and the lift.

use kurbo::{Affine, Line, Point, Rect, Vec2};
use yard_index::Aabb;

use crate::collide;

/// A centered rectangle rotated about its center.
///
/// `width` runs along the local x axis and `length` along the local y axis.
/// The local +y axis is the "forward" direction. `angle` is in degrees,
/// counter-clockwise.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    /// Center in world space.
    pub center: Point,
    /// Extent along the local x axis.
    pub width: f64,
    /// Extent along the local y axis.
    pub length: f64,
    /// Rotation in degrees, counter-clockwise.
    pub angle: f64,
}

impl Footprint {
    /// Create a footprint.
    pub const fn new(center: Point, width: f64, length: f64, angle: f64) -> Self {
        Self {
            center,
            width,
            length,
            angle,
        }
    }

    /// Create an unrotated footprint.
    pub const fn axis_aligned(center: Point, width: f64, length: f64) -> Self {
        Self::new(center, width, length, 0.0)
    }

    /// Local-to-world transform: rotate about the origin, then move to `center`.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.center.to_vec2()) * Affine::rotate(self.angle.to_radians())
    }

    /// The untransformed rectangle, centered on the origin.
    pub fn local_rect(&self) -> Rect {
        Rect::from_center_size(Point::ORIGIN, (self.width, self.length))
    }

    /// Unit vector along the local +y axis.
    pub fn forward(&self) -> Vec2 {
        let th = self.angle.to_radians();
        Vec2::new(-th.sin(), th.cos())
    }

    /// Unit vector along the local +x axis.
    pub fn right(&self) -> Vec2 {
        let th = self.angle.to_radians();
        Vec2::new(th.cos(), th.sin())
    }

    /// World-space corners, counter-clockwise from the local (-x, -y) corner.
    pub fn corners(&self) -> [Point; 4] {
        let hx = self.right() * (self.width * 0.5);
        let hy = self.forward() * (self.length * 0.5);
        let c = self.center;
        [c - hx - hy, c + hx - hy, c + hx + hy, c - hx + hy]
    }

    /// World-space edges, following [`corners`](Self::corners).
    pub fn edges(&self) -> [Line; 4] {
        let [a, b, c, d] = self.corners();
        [Line::new(a, b), Line::new(b, c), Line::new(c, d), Line::new(d, a)]
    }

    /// The two edge normals used as separating axes.
    pub fn axes(&self) -> [Vec2; 2] {
        [self.right(), self.forward()]
    }

    /// Conservative axis-aligned bounds in world space.
    pub fn bounding_box(&self) -> Rect {
        transform_rect_bbox(self.transform(), self.local_rect())
    }

    /// Bounds as a broad-phase index entry.
    pub fn aabb(&self) -> Aabb {
        let r = self.bounding_box();
        Aabb::new(r.x0, r.y0, r.x1, r.y1)
    }

    /// Same center and angle, dimensions multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            length: self.length * factor,
            ..*self
        }
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains(&self, p: Point) -> bool {
        collide::point_in_rectangle(p, self)
    }

    /// Strict overlap with another footprint.
    pub fn overlaps(&self, other: &Self) -> bool {
        collide::rectangles_overlap(self, other)
    }

    /// Whether all dimensions and coordinates are finite, the size is
    /// positive, and the bounds do not overflow.
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.angle.is_finite()
            && self.width.is_finite()
            && self.length.is_finite()
            && self.width > 0.0
            && self.length > 0.0
            && self.aabb().is_finite()
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box in world space.
pub(crate) fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let p0 = affine * Point::new(rect.x0, rect.y0);
    let p1 = affine * Point::new(rect.x1, rect.y0);
    let p2 = affine * Point::new(rect.x0, rect.y1);
    let p3 = affine * Point::new(rect.x1, rect.y1);
    let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
    let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
    let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
    let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < EPS
    }

    #[test]
    fn corners_match_transform() {
        let f = Footprint::new(Point::new(3.0, -2.0), 4.0, 10.0, 30.0);
        let tf = f.transform();
        let r = f.local_rect();
        let expected = [
            tf * Point::new(r.x0, r.y0),
            tf * Point::new(r.x1, r.y0),
            tf * Point::new(r.x1, r.y1),
            tf * Point::new(r.x0, r.y1),
        ];
        for (got, want) in f.corners().into_iter().zip(expected) {
            assert!(close(got, want), "{got:?} != {want:?}");
        }
    }

    #[test]
    fn forward_follows_angle() {
        let f = Footprint::axis_aligned(Point::ORIGIN, 1.0, 1.0);
        assert!((f.forward() - Vec2::new(0.0, 1.0)).hypot() < EPS);
        let turned = Footprint { angle: 90.0, ..f };
        assert!((turned.forward() - Vec2::new(-1.0, 0.0)).hypot() < EPS);
    }

    #[test]
    fn rotated_bbox_expands() {
        let f = Footprint::new(Point::ORIGIN, 10.0, 10.0, 45.0);
        let bb = f.bounding_box();
        let diag = 10.0 * core::f64::consts::SQRT_2;
        assert!((bb.width() - diag).abs() < EPS);
        assert!((bb.height() - diag).abs() < EPS);
        let aabb = f.aabb();
        assert!((aabb.max_x - diag * 0.5).abs() < EPS);
    }

    #[test]
    fn degenerate_sizes_are_invalid() {
        assert!(Footprint::axis_aligned(Point::ORIGIN, 1.0, 2.0).is_valid());
        assert!(!Footprint::axis_aligned(Point::ORIGIN, 0.0, 2.0).is_valid());
        assert!(!Footprint::axis_aligned(Point::new(f64::NAN, 0.0), 1.0, 2.0).is_valid());
        assert!(
            !Footprint::axis_aligned(Point::new(1.0e308, 0.0), f64::MAX, 1.0).is_valid(),
            "bounds overflow"
        );
    }
}
