// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry basics.
//!
//! Oriented rectangles, edge contact, picking, probes, and the broad phase.
//!
//! Run:
//! - `cargo run -p yard_demos --example geometry_basics`

use kurbo::{Point, Vec2};
use yard_geometry::{Footprint, RigidMotion, rectangles_overlap, segment_intersects_rectangle};
use yard_index::{Index, UniformGrid};

fn main() {
    let a = Footprint::axis_aligned(Point::new(0.0, 0.0), 10.0, 10.0);
    let touching = Footprint::axis_aligned(Point::new(10.0, 0.0), 10.0, 10.0);
    let diamond = Footprint::new(Point::new(6.5, 6.5), 4.0, 4.0, 45.0);

    println!("a / touching overlap: {}", rectangles_overlap(&a, &touching));
    println!("a / diamond overlap: {}", rectangles_overlap(&a, &diamond));
    println!("diamond bounds: {:?}", diamond.bounding_box());

    let probe = (Point::new(-20.0, 3.0), Point::new(20.0, 3.0));
    println!(
        "probe hits a: {}",
        segment_intersects_rectangle(probe.0, probe.1, &a)
    );

    let turn = RigidMotion {
        translation: Vec2::new(0.0, 5.0),
        rotation: 90.0,
        pivot: Point::ORIGIN,
    };
    println!("touching after turn: {:?}", turn.apply(&touching));

    let mut index: Index<u32, UniformGrid> = Index::with_uniform_grid(8.0);
    for (i, f) in [a, touching, diamond].iter().enumerate() {
        index.insert(f.aabb(), u32::try_from(i).unwrap_or(u32::MAX));
    }
    let candidates: Vec<u32> = index.query_point(9.0, 9.0).map(|(_, i)| i).collect();
    println!("broad-phase candidates at (9, 9): {candidates:?}");
}
