// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Yard Geometry: oriented rectangles on top of Kurbo.
//!
//! Every physical object in a yard occupies a [`Footprint`]: a rectangle of
//! given width and length, centered on a point and rotated by an angle in
//! degrees. This crate provides the exact tests the rest of the yard relies on:
//!
//! - [`rectangles_overlap`]: separating axis test over the four edge normals.
//!   Rectangles that merely touch do not overlap, so "just touching" is a legal
//!   resting position.
//! - [`point_in_rectangle`]: boundary-inclusive picking.
//! - [`segment_intersects_rectangle`]: probe rays used to find what lies ahead.
//! - [`RigidMotion`]: a rotation about a pivot plus a translation, applied
//!   identically to a vehicle and the cargo it carries.
//!
//! Footprints convert to [`yard_index::Aabb`] for broad-phase indexing; the
//! bounds are conservative under rotation.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use yard_geometry::{Footprint, rectangles_overlap};
//!
//! let a = Footprint::axis_aligned(Point::new(0.0, 0.0), 10.0, 10.0);
//! let b = Footprint::new(Point::new(9.0, 0.0), 4.0, 4.0, 45.0);
//! let c = Footprint::axis_aligned(Point::new(10.0, 0.0), 10.0, 10.0);
//!
//! assert!(rectangles_overlap(&a, &b));
//! // Shared edge only.
//! assert!(!rectangles_overlap(&a, &c));
//! ```

pub mod collide;
pub mod footprint;
pub mod motion;

pub use collide::{
    OVERLAP_EPSILON, point_in_rectangle, rectangles_overlap, segment_intersects_rectangle,
};
pub use footprint::Footprint;
pub use motion::RigidMotion;
