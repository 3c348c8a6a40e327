// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use yard_engine::{BundleDraft, BundleMetadata, Yard};
use yard_geometry::{Footprint, rectangles_overlap};

/// A yard with `rows × cols` columns of bundles, each stacked `levels` high.
fn stacked_yard(rows: usize, cols: usize, levels: usize) -> Yard {
    let mut yard = Yard::new();
    for r in 0..rows {
        for c in 0..cols {
            for l in 0..levels {
                let draft = BundleDraft {
                    footprint: Footprint::new(
                        Point::new(c as f64 * 12.0, r as f64 * 12.0 + l as f64 * 0.5),
                        10.0,
                        10.0,
                        (l * 7 % 20) as f64,
                    ),
                    height: 2.0,
                    metadata: BundleMetadata::default(),
                };
                let _ = yard.create_bundle_with(draft);
            }
        }
    }
    yard
}

fn bench_overlap(c: &mut Criterion) {
    let a = Footprint::new(Point::new(0.0, 0.0), 10.0, 4.0, 30.0);
    let b = Footprint::new(Point::new(6.0, 2.0), 3.0, 9.0, -15.0);
    c.bench_function("rectangles_overlap", |bench| {
        bench.iter(|| rectangles_overlap(black_box(&a), black_box(&b)));
    });
}

fn bench_create(c: &mut Criterion) {
    c.bench_function("create_stacked_10x10x4", |b| {
        b.iter(|| black_box(stacked_yard(10, 10, 4).bundle_count()));
    });
}

fn bench_reflow(c: &mut Criterion) {
    let yard = stacked_yard(10, 10, 4);
    let base = yard.bundles().map(|b| b.id).next();
    c.bench_function("move_stack_base", |b| {
        b.iter_batched(
            || yard.clone(),
            |mut yard| {
                if let Some(id) = base {
                    let _ = yard.modify_bundle_position(id, Point::new(-40.0, 0.0));
                }
                black_box(yard.bundle_count());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_lift(c: &mut Criterion) {
    let yard = stacked_yard(10, 10, 4);
    c.bench_function("lift_approach", |b| {
        b.iter_batched(
            || yard.clone(),
            |mut yard| black_box(yard.move_lift_to_bundle().is_ok()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_overlap, bench_create, bench_reflow, bench_lift);
criterion_main!(benches);
