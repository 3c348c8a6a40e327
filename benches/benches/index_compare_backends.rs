// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use yard_index::{Aabb, Backend, FlatVec, Index, UniformGrid};

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Aabb> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb::from_xywh(x as f64 * cell, y as f64 * cell, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Yard-like layout: bundles of similar size scattered over a lot.
fn gen_scattered_boxes(count: usize, extent: f64, size: f64) -> Vec<Aabb> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * (extent - size);
            let y = rng.next_f64() * (extent - size);
            Aabb::from_xywh(x, y, size, size)
        })
        .collect()
}

fn fill<B: Backend>(mut idx: Index<u32, B>, boxes: &[Aabb]) -> Index<u32, B> {
    for (i, b) in boxes.iter().copied().enumerate() {
        idx.insert(b, i as u32);
    }
    idx
}

fn bench_insert_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_then_query");
    for &n in &[16usize, 32, 64] {
        let boxes = gen_grid_boxes(n, 10.0);
        let query = Aabb::from_xywh(50.0, 50.0, 100.0, 100.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("flatvec_n{n}"), |b| {
            b.iter_batched(
                Index::<u32, FlatVec>::new,
                |idx| {
                    let idx = fill(idx, &boxes);
                    black_box(idx.query_rect(query).count());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter_batched(
                || Index::<u32, UniformGrid>::with_uniform_grid(32.0),
                |idx| {
                    let idx = fill(idx, &boxes);
                    black_box(idx.query_rect(query).count());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_query_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_heavy");
    let boxes = gen_scattered_boxes(2048, 2000.0, 12.0);
    let flat = fill(Index::<u32, FlatVec>::new(), &boxes);
    let grid = fill(Index::<u32, UniformGrid>::with_uniform_grid(32.0), &boxes);
    group.bench_function("flatvec_points", |b| {
        b.iter(|| {
            let mut total = 0;
            for q in 0..256 {
                let x = (q % 16) as f64 * 120.0;
                let y = (q / 16) as f64 * 120.0;
                total += flat.query_point(x, y).count();
            }
            black_box(total)
        });
    });
    group.bench_function("grid_points", |b| {
        b.iter(|| {
            let mut total = 0;
            for q in 0..256 {
                let x = (q % 16) as f64 * 120.0;
                let y = (q / 16) as f64 * 120.0;
                total += grid.query_point(x, y).count();
            }
            black_box(total)
        });
    });
    group.finish();
}

fn bench_update_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy");
    let boxes = gen_grid_boxes(32, 10.0);
    group.bench_function("grid_move_all", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<u32, UniformGrid>::with_uniform_grid(32.0);
                let keys: Vec<_> = boxes
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| idx.insert(r, i as u32))
                    .collect();
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (j, k) in keys.into_iter().enumerate() {
                    let dx = (j % 5) as f64 - 2.0;
                    idx.update(k, Aabb::from_xywh(10.0 * j as f64 + dx, dx, 10.0, 10.0));
                }
                black_box(idx.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert_query, bench_query_heavy, bench_update_heavy);
criterion_main!(benches);
