// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connected components of the footprint-overlap relation.

use std::collections::{BTreeSet, VecDeque};

use crate::store::BundleStore;
use crate::types::{Bundle, BundleId};

/// Every bundle reachable from `origin` through overlapping footprints.
///
/// Heights are ignored. The origin itself is not part of the result, and an
/// unknown origin yields an empty set.
pub fn transitive_colliders(store: &BundleStore, origin: BundleId) -> BTreeSet<BundleId> {
    if !store.contains(origin) {
        return BTreeSet::new();
    }
    let mut group = transitive_colliders_where(store, [origin], |_| true);
    group.remove(&origin);
    group
}

/// Breadth-first closure from `seeds` over bundles accepted by `accept`.
///
/// Seeds that are unknown or rejected are dropped. A bundle is enqueued at
/// most once, so cycles in the overlap relation terminate.
pub fn transitive_colliders_where(
    store: &BundleStore,
    seeds: impl IntoIterator<Item = BundleId>,
    accept: impl Fn(&Bundle) -> bool,
) -> BTreeSet<BundleId> {
    let mut seen = BTreeSet::new();
    let mut frontier = VecDeque::new();
    for id in seeds {
        if store.get(id).is_some_and(&accept) && seen.insert(id) {
            frontier.push_back(id);
        }
    }
    while let Some(id) = frontier.pop_front() {
        for next in store.neighbors(id) {
            if seen.contains(&next) {
                continue;
            }
            if store.get(next).is_some_and(&accept) {
                seen.insert(next);
                frontier.push_back(next);
            }
        }
    }
    tracing::trace!(size = seen.len(), "collision group walked");
    seen
}

/// Every bundle stacked on `origin`, directly or through other bundles.
///
/// The walk only climbs: from each reached bundle it follows the overlapping
/// bundles whose base is at or above that bundle's top. The origin itself is
/// not part of the result.
pub fn bundles_above(store: &BundleStore, origin: BundleId) -> BTreeSet<BundleId> {
    let mut seen = BTreeSet::new();
    let mut frontier = VecDeque::from([origin]);
    while let Some(id) = frontier.pop_front() {
        let Some(top) = store.get(id).map(Bundle::top_z) else {
            continue;
        };
        for next in store.neighbors(id) {
            if next == origin || seen.contains(&next) {
                continue;
            }
            if store.get(next).is_some_and(|b| b.z >= top) {
                seen.insert(next);
                frontier.push_back(next);
            }
        }
    }
    tracing::trace!(bundle = %origin, size = seen.len(), "stack above walked");
    seen
}
