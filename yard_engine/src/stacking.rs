// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical placement of bundles.
//!
//! A bundle rests on the highest bundle whose footprint overlaps its own, or
//! on the ground when nothing does. After an edit, the edited bundle is placed
//! again by that rule and only the bundles stacked on it follow.

use std::collections::BTreeSet;

use crate::graph::bundles_above;
use crate::store::BundleStore;
use crate::types::{Bundle, BundleId};

/// Base elevation for `bundle` resting on `candidates`.
///
/// Candidates sharing the bundle's identifier are skipped.
pub fn place_on_top<'a>(
    bundle: &Bundle,
    candidates: impl IntoIterator<Item = &'a Bundle>,
) -> f64 {
    candidates
        .into_iter()
        .filter(|c| c.id != bundle.id && c.overlaps(bundle))
        .map(Bundle::top_z)
        .fold(0.0, f64::max)
}

/// Store `edited` in place of its previous version and restack around it.
///
/// The affected set is every bundle stacked on the previous version of the
/// edited bundle. The edited bundle is placed first against everything
/// outside that set, so it climbs onto any bundle it now overlaps. Affected
/// bundles follow in ascending `(z, id)` order, each placed against every
/// bundle no longer pending. Other bundles keep their elevation.
///
/// Returns the identifiers whose elevation changed, the edited bundle
/// included when its elevation moved.
pub fn reflow_after_edit(store: &mut BundleStore, edited: Bundle) -> Vec<BundleId> {
    let id = edited.id;
    let Some(before) = store.get(id) else {
        let z = place_on_top(&edited, store.iter());
        store.insert(Bundle { z, ..edited });
        return vec![id];
    };
    let old_z = before.z;
    let mut affected: Vec<(f64, BundleId)> = bundles_above(store, id)
        .into_iter()
        .filter_map(|other| store.get(other).map(|b| (b.z, other)))
        .collect();
    affected.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    store.insert(edited);
    tracing::trace!(bundle = %id, affected = affected.len(), "reflow");

    let mut pending: BTreeSet<BundleId> = affected.iter().map(|(_, other)| *other).collect();
    let mut changed = Vec::new();
    if restack(store, id, &pending, old_z) {
        changed.push(id);
    }
    for (z, other) in affected {
        pending.remove(&other);
        if restack(store, other, &pending, z) {
            changed.push(other);
        }
    }
    changed
}

/// Place `id` against every bundle outside `pending`. Reports whether its
/// elevation differs from `previous`.
fn restack(
    store: &mut BundleStore,
    id: BundleId,
    pending: &BTreeSet<BundleId>,
    previous: f64,
) -> bool {
    let Some(bundle) = store.get(id) else {
        return false;
    };
    let z = place_on_top(bundle, store.iter().filter(|b| !pending.contains(&b.id)));
    store.set_z(id, z);
    z != previous
}
