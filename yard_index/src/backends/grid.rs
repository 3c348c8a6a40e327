// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb;

type Cell = (i64, i64);

/// `f64::floor` for `no_std`: same result for every input, including NaN,
/// infinities and signed zero.
#[inline]
fn floor_f64(v: f64) -> f64 {
    // Values with magnitude >= 2^52 (and NaN/infinities) are already integral.
    if !(v > -4_503_599_627_370_496.0 && v < 4_503_599_627_370_496.0) || v == 0.0 {
        return v;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "magnitude is below 2^52, so the value fits in i64."
    )]
    let t = v as i64 as f64;
    if t > v { t - 1.0 } else { t }
}

/// Most cells a single AABB may be registered in. Larger entries live in a
/// side list that every query scans, and larger query rectangles scan every
/// entry instead of walking cells.
pub const MAX_CELLS_PER_AABB: f64 = 4096.0;

/// Uniform grid backend.
///
/// Space is cut into `cell_w × cell_h` cells starting at `origin`. Each slot is
/// registered in every cell its AABB covers, so a query only visits the slots
/// sharing a cell with it. Negative coordinates are fine: cell indices use
/// floor division relative to the origin. AABBs spanning more than
/// [`MAX_CELLS_PER_AABB`] cells are kept in a separate list, which bounds the
/// work done per insert and per query.
#[derive(Clone)]
pub struct UniformGrid {
    cell_w: f64,
    cell_h: f64,
    origin_x: f64,
    origin_y: f64,
    entries: Vec<Option<Aabb>>,
    cells: BTreeMap<Cell, Vec<usize>>,
    large: Vec<usize>,
}

impl UniformGrid {
    /// Create a grid backend with the given cell size and origin offset.
    pub fn new(cell_w: f64, cell_h: f64, origin_x: f64, origin_y: f64) -> Self {
        debug_assert!(cell_w > 0.0 && cell_h > 0.0, "cell sizes must be positive");
        Self {
            cell_w,
            cell_h,
            origin_x,
            origin_y,
            entries: Vec::new(),
            cells: BTreeMap::new(),
            large: Vec::new(),
        }
    }

    /// Create a grid of square cells anchored at the origin.
    pub fn with_cell_size(cell: f64) -> Self {
        Self::new(cell, cell, 0.0, 0.0)
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "cell indices saturate for out-of-range coordinates."
        )]
        let i = v as i64;
        if (i as f64) > v { i - 1 } else { i }
    }

    fn cell_for(&self, x: f64, y: f64) -> Cell {
        (
            Self::floor_to_i64((x - self.origin_x) / self.cell_w),
            Self::floor_to_i64((y - self.origin_y) / self.cell_h),
        )
    }

    /// Whether `a` covers few enough cells to be registered cell by cell.
    fn fits_cells(&self, a: &Aabb) -> bool {
        let span = |lo: f64, hi: f64, origin: f64, cell: f64| {
            floor_f64((hi - origin) / cell) - floor_f64((lo - origin) / cell) + 1.0
        };
        let w = span(a.min_x, a.max_x, self.origin_x, self.cell_w);
        let h = span(a.min_y, a.max_y, self.origin_y, self.cell_h);
        let count = w * h;
        count.is_finite() && count <= MAX_CELLS_PER_AABB
    }

    fn cells_for(&self, a: &Aabb) -> impl Iterator<Item = Cell> + use<> {
        let (x0, y0) = self.cell_for(a.min_x, a.min_y);
        let (x1, y1) = self.cell_for(a.max_x, a.max_y);
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }

    fn link(&mut self, slot: usize, aabb: &Aabb) {
        if !self.fits_cells(aabb) {
            self.large.push(slot);
            return;
        }
        for cell in self.cells_for(aabb) {
            self.cells.entry(cell).or_default().push(slot);
        }
    }

    fn unlink(&mut self, slot: usize) {
        let Some(Some(old)) = self.entries.get(slot).copied() else {
            return;
        };
        if !self.fits_cells(&old) {
            self.large.retain(|&s| s != slot);
            return;
        }
        for cell in self.cells_for(&old) {
            if let Some(slots) = self.cells.get_mut(&cell) {
                slots.retain(|&s| s != slot);
                if slots.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    fn hits_rect(&self, slot: usize, rect: &Aabb) -> bool {
        matches!(self.entries.get(slot), Some(Some(a)) if a.intersects(rect))
    }
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self::with_cell_size(32.0)
    }
}

impl Backend for UniformGrid {
    fn insert(&mut self, slot: usize, aabb: Aabb) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.unlink(slot);
        self.entries[slot] = Some(aabb);
        self.link(slot, &aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb) {
        if slot >= self.entries.len() {
            return;
        }
        self.unlink(slot);
        self.entries[slot] = Some(aabb);
        self.link(slot, &aabb);
    }

    fn remove(&mut self, slot: usize) {
        self.unlink(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
        self.large.clear();
    }

    fn query_point<'a>(&'a self, x: f64, y: f64) -> Box<dyn Iterator<Item = usize> + 'a> {
        let slots = self.cells.get(&self.cell_for(x, y));
        Box::new(
            slots
                .into_iter()
                .flatten()
                .chain(&self.large)
                .copied()
                .filter(move |&s| {
                    matches!(self.entries.get(s), Some(Some(a)) if a.contains_point(x, y))
                }),
        )
    }

    fn query_rect<'a>(&'a self, rect: Aabb) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut set = BTreeSet::new();
        if self.fits_cells(&rect) {
            for cell in self.cells_for(&rect) {
                if let Some(slots) = self.cells.get(&cell) {
                    set.extend(slots.iter().copied().filter(|&s| self.hits_rect(s, &rect)));
                }
            }
            set.extend(self.large.iter().copied().filter(|&s| self.hits_rect(s, &rect)));
        } else {
            set.extend((0..self.entries.len()).filter(|&s| self.hits_rect(s, &rect)));
        }
        Box::new(set.into_iter())
    }
}

impl Debug for UniformGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("UniformGrid")
            .field("cell_w", &self.cell_w)
            .field("cell_h", &self.cell_h)
            .field("origin_x", &self.origin_x)
            .field("origin_y", &self.origin_y)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .field("large", &self.large.len())
            .finish_non_exhaustive()
    }
}
