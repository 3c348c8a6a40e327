// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::grid::UniformGrid;
use crate::types::Aabb;

/// Generational handle for entries.
///
/// A key stays valid until its entry is removed. Reusing the slot bumps the
/// generation, so a stale key never aliases a newer entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<P> {
    generation: u32,
    payload: P,
}

/// An AABB index parameterized by a spatial backend.
///
/// Changes are applied to the backend immediately; queries always see the
/// latest state.
#[derive(Clone, Debug)]
pub struct Index<P: Copy, B: Backend = FlatVec> {
    entries: Vec<Option<Entry<P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    len: usize,
    backend: B,
}

impl<P: Copy, B: Backend + Default> Default for Index<P, B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<P: Copy> Index<P> {
    /// Create an empty index using the flat vector backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Copy> Index<P, UniformGrid> {
    /// Create a grid-backed index with square cells anchored at the origin.
    pub fn with_uniform_grid(cell: f64) -> Self {
        Self::with_backend(UniformGrid::with_cell_size(cell))
    }
}

impl<P: Copy, B: Backend> Index<P, B> {
    /// Create an empty index around an explicit backend instance.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            backend,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no entries are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb, payload: P) -> Key {
        debug_assert!(aabb.is_finite(), "index bounds must be finite");
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.entries.push(None);
            self.generations.push(1);
            (self.entries.len() - 1, 1)
        };
        self.entries[idx] = Some(Entry {
            generation,
            payload,
        });
        self.backend.insert(idx, aabb);
        self.len += 1;
        Key::new(idx, generation)
    }

    /// Update an existing AABB. Stale keys are ignored.
    pub fn update(&mut self, key: Key, aabb: Aabb) {
        debug_assert!(aabb.is_finite(), "index bounds must be finite");
        if self.entry_mut(key).is_some() {
            self.backend.update(key.idx(), aabb);
        }
    }

    /// Remove an existing entry, returning its payload. Stale keys are ignored.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        self.entry_mut(key)?;
        let entry = self.entries[key.idx()].take()?;
        self.backend.remove(key.idx());
        self.free_list.push(key.idx());
        self.len -= 1;
        Some(entry.payload)
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generations.clear();
        self.free_list.clear();
        self.len = 0;
        self.backend.clear();
    }

    /// Query for entries whose AABB contains the point.
    pub fn query_point(&self, x: f64, y: f64) -> impl Iterator<Item = (Key, P)> + '_ {
        self.backend
            .query_point(x, y)
            .filter_map(move |i| self.resolve(i))
    }

    /// Query for entries whose AABB intersects the given rectangle.
    pub fn query_rect(&self, rect: Aabb) -> impl Iterator<Item = (Key, P)> + '_ {
        self.backend
            .query_rect(rect)
            .filter_map(move |i| self.resolve(i))
    }

    fn resolve(&self, slot: usize) -> Option<(Key, P)> {
        let e = self.entries.get(slot)?.as_ref()?;
        Some((Key::new(slot, e.generation), e.payload))
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}
