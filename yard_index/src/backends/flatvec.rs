// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny yards.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb;

/// Flat vector backend with linear scans.
#[derive(Clone, Default)]
pub struct FlatVec {
    entries: Vec<Option<Aabb>>,
}

impl Debug for FlatVec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl Backend for FlatVec {
    fn insert(&mut self, slot: usize, aabb: Aabb) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = Some(aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn query_point<'a>(&'a self, x: f64, y: f64) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(
            self.entries
                .iter()
                .enumerate()
                .filter_map(move |(i, slot)| match slot {
                    Some(a) if a.contains_point(x, y) => Some(i),
                    _ => None,
                }),
        )
    }

    fn query_rect<'a>(&'a self, rect: Aabb) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(
            self.entries
                .iter()
                .enumerate()
                .filter_map(move |(i, slot)| match slot {
                    Some(a) if a.intersects(&rect) => Some(i),
                    _ => None,
                }),
        )
    }
}
