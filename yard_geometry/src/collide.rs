// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact intersection tests between footprints, points, and segments.

use kurbo::{Point, Vec2};

use crate::footprint::Footprint;

/// Minimum penetration, along every axis, for two footprints to overlap.
///
/// Footprints in edge contact stay apart even after rotation, which
/// introduces errors around `1e-16` per unit length.
pub const OVERLAP_EPSILON: f64 = 1e-9;

/// Whether two oriented rectangles strictly overlap.
///
/// Separating axis test over the two edge normals of each rectangle. Returns
/// `false` for rectangles that only touch along an edge or at a corner.
pub fn rectangles_overlap(a: &Footprint, b: &Footprint) -> bool {
    let ca = a.corners();
    let cb = b.corners();
    a.axes().into_iter().chain(b.axes()).all(|axis| {
        let (a0, a1) = project(&ca, axis);
        let (b0, b1) = project(&cb, axis);
        a1 - b0 > OVERLAP_EPSILON && b1 - a0 > OVERLAP_EPSILON
    })
}

/// Whether `p` lies inside `r` or on its boundary.
///
/// The point is moved into the rectangle's local frame and compared against
/// the half extents.
pub fn point_in_rectangle(p: Point, r: &Footprint) -> bool {
    let local = r.transform().inverse() * p;
    let hw = r.width * 0.5 + OVERLAP_EPSILON;
    let hl = r.length * 0.5 + OVERLAP_EPSILON;
    local.x.abs() <= hw && local.y.abs() <= hl
}

/// Whether the segment `p1`–`p2` touches `r`.
///
/// True when either endpoint is inside the rectangle or the segment crosses
/// one of its four edges.
pub fn segment_intersects_rectangle(p1: Point, p2: Point, r: &Footprint) -> bool {
    if point_in_rectangle(p1, r) || point_in_rectangle(p2, r) {
        return true;
    }
    r.edges()
        .iter()
        .any(|e| segments_intersect(p1, p2, e.p0, e.p1))
}

fn project(corners: &[Point; 4], axis: Vec2) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for c in corners {
        let d = c.to_vec2().dot(axis);
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
