// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for broad-phase strategies.

use alloc::boxed::Box;

use crate::types::Aabb;

/// Spatial backend abstraction used by [`Index`](crate::Index).
///
/// Backends only see slot numbers; payloads and generations live in the index.
pub trait Backend {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb);

    /// Update an existing slot's AABB.
    fn update(&mut self, slot: usize, aabb: Aabb);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Query slots whose AABB contains the point.
    fn query_point<'a>(&'a self, x: f64, y: f64) -> Box<dyn Iterator<Item = usize> + 'a>;

    /// Query slots whose AABB intersects the rectangle.
    fn query_rect<'a>(&'a self, rect: Aabb) -> Box<dyn Iterator<Item = usize> + 'a>;
}
