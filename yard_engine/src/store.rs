// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bundle storage with a broad-phase index kept in step.

use std::collections::BTreeMap;

use kurbo::Point;
use yard_geometry::Footprint;
use yard_index::{Index, Key, UniformGrid};

use crate::types::{Bundle, BundleId};

#[derive(Clone, Debug)]
struct Slot {
    bundle: Bundle,
    key: Key,
}

/// Bundles keyed by identifier.
///
/// Every footprint query goes through a uniform grid first and then through
/// the exact overlap test. Results come back in ascending identifier order.
#[derive(Clone, Debug)]
pub struct BundleStore {
    slots: BTreeMap<BundleId, Slot>,
    index: Index<BundleId, UniformGrid>,
    cell_size: f64,
}

impl BundleStore {
    /// An empty store whose grid uses square cells of `cell_size`.
    pub fn new(cell_size: f64) -> Self {
        Self {
            slots: BTreeMap::new(),
            index: Index::with_uniform_grid(cell_size),
            cell_size,
        }
    }

    /// A store holding `bundles`. Later duplicates replace earlier ones.
    pub fn from_bundles(cell_size: f64, bundles: impl IntoIterator<Item = Bundle>) -> Self {
        let mut store = Self::new(cell_size);
        for b in bundles {
            store.insert(b);
        }
        store
    }

    /// Number of bundles.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store holds no bundles.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a bundle with this identifier exists.
    pub fn contains(&self, id: BundleId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Look up a bundle.
    pub fn get(&self, id: BundleId) -> Option<&Bundle> {
        self.slots.get(&id).map(|s| &s.bundle)
    }

    /// All bundles in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Bundle> + '_ {
        self.slots.values().map(|s| &s.bundle)
    }

    /// Insert a bundle, returning the one it replaces.
    pub fn insert(&mut self, bundle: Bundle) -> Option<Bundle> {
        let aabb = bundle.footprint.aabb();
        if let Some(slot) = self.slots.get_mut(&bundle.id) {
            self.index.update(slot.key, aabb);
            return Some(core::mem::replace(&mut slot.bundle, bundle));
        }
        let key = self.index.insert(aabb, bundle.id);
        self.slots.insert(bundle.id, Slot { bundle, key });
        None
    }

    /// Remove a bundle.
    pub fn remove(&mut self, id: BundleId) -> Option<Bundle> {
        let slot = self.slots.remove(&id)?;
        self.index.remove(slot.key);
        Some(slot.bundle)
    }

    /// Change only the base elevation. Returns `false` for unknown ids.
    pub fn set_z(&mut self, id: BundleId, z: f64) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.bundle.z = z;
                true
            }
            None => false,
        }
    }

    /// Bundles whose footprint strictly overlaps `footprint`, at any height.
    pub fn colliding(&self, footprint: &Footprint) -> Vec<BundleId> {
        let mut ids: Vec<BundleId> = self
            .index
            .query_rect(footprint.aabb())
            .map(|(_, id)| id)
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|b| b.footprint.overlaps(footprint))
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Bundles other than `id` whose footprint overlaps that bundle's footprint.
    pub fn neighbors(&self, id: BundleId) -> Vec<BundleId> {
        let Some(bundle) = self.get(id) else {
            return Vec::new();
        };
        let mut ids = self.colliding(&bundle.footprint);
        ids.retain(|other| *other != id);
        ids
    }

    /// Bundles whose footprint contains `p`, lowest first.
    pub fn bundles_at(&self, p: Point) -> Vec<&Bundle> {
        let mut hits: Vec<&Bundle> = self
            .index
            .query_point(p.x, p.y)
            .filter_map(|(_, id)| self.get(id))
            .filter(|b| b.footprint.contains(p))
            .collect();
        hits.sort_by(|a, b| a.z.total_cmp(&b.z).then(a.id.cmp(&b.id)));
        hits
    }

    /// The highest bundle containing `p`.
    pub fn top_bundle_at(&self, p: Point) -> Option<&Bundle> {
        self.bundles_at(p).pop()
    }

    /// Copy every bundle into an ordered map.
    pub fn to_map(&self) -> BTreeMap<BundleId, Bundle> {
        self.slots
            .iter()
            .map(|(id, s)| (*id, s.bundle.clone()))
            .collect()
    }

    /// Cell size of the broad-phase grid.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}
