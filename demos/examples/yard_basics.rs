// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Yard basics.
//!
//! Stack a few bundles, slide the base away, and undo the move.
//!
//! Run:
//! - `cargo run -p yard_demos --example yard_basics`
//! - `RUST_LOG=yard_basics=info,yard_engine=debug cargo run -p yard_demos --example yard_basics`

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use yard_engine::{BundleEdit, BundleMetadata, CollisionQuery, Yard, YardError};

fn main() -> Result<(), YardError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut yard = Yard::new();
    let base = yard.create_bundle(Point::new(0.0, 0.0))?;
    let middle = yard.create_bundle(Point::new(5.0, 5.0))?;
    let top = yard.create_bundle(Point::new(12.0, 12.0))?;
    print_stack(&yard, "after stacking");

    let group = yard.transitive_colliders(base)?;
    let over_middle = yard.query_collisions(&CollisionQuery::Bundle(middle))?;
    tracing::info!(%base, ?group, "collision group");
    tracing::info!(%middle, overlapping = ?over_middle, "plan overlaps");
    assert!(yard.is_covered(base)?);

    yard.modify_bundle_properties(&BundleEdit {
        metadata: Some(BundleMetadata {
            barcode: "YB-0001".into(),
            essence: "pine".into(),
            plank_size: "2x6".into(),
            date: "2025-03-14".into(),
            time: "08:30".into(),
        }),
        ..BundleEdit::new(top)
    })?;

    yard.modify_bundle_position(base, Point::new(40.0, 0.0))?;
    print_stack(&yard, "after moving the base");

    let restored = yard.undo()?;
    tracing::info!(bundles = restored.bundles.len(), "move undone");
    print_stack(&yard, "after undo");

    let picked = yard.top_bundle_at(Point::new(6.0, 6.0)).map(|b| b.id);
    println!("top bundle at (6, 6): {picked:?}");
    Ok(())
}

fn print_stack(yard: &Yard, label: &str) {
    println!("{label}:");
    for b in yard.bundle_dtos() {
        println!(
            "  {:>3} at ({:6.1}, {:6.1}) z = {:4.1} .. {:4.1} {}",
            b.id, b.x, b.y, b.z, b.top_z, b.metadata.barcode
        );
    }
}
