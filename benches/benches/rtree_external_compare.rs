// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree as RStarTree};
use tessera_benches::{numbered, scattered_extents, viewports};
use tessera_index::{Extent, RTree, RTreeConfig, RTreeF64};

type Boxed = GeomWithData<Rectangle<[f64; 2]>, u32>;

fn to_rstar(entries: &[(Extent<f64>, u32)]) -> Vec<Boxed> {
    entries
        .iter()
        .map(|&(e, id)| {
            GeomWithData::new(Rectangle::from_corners([e.min_x, e.min_y], [e.max_x, e.max_y]), id)
        })
        .collect()
}

fn envelope(e: Extent<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([e.min_x, e.min_y], [e.max_x, e.max_y])
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_build");
    let entries = numbered(&scattered_extents(10_000, 0x5CA7_7E2D));
    let boxed = to_rstar(&entries);
    group.throughput(Throughput::Elements(entries.len() as u64));

    group.bench_function("tessera_insert", |b| {
        b.iter(|| {
            let mut tree = RTreeF64::<u32>::new();
            for &(e, id) in &entries {
                let _ = tree.insert(e, id);
            }
            black_box(tree.len())
        })
    });
    group.bench_function("rstar_insert", |b| {
        b.iter(|| {
            let mut tree = RStarTree::new();
            for r in &boxed {
                tree.insert(*r);
            }
            black_box(tree.size())
        })
    });
    group.bench_function("tessera_bulk_load", |b| {
        b.iter_batched(
            || entries.clone(),
            |entries| black_box(RTree::bulk_load(RTreeConfig::default(), entries).map(|t| t.len())),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("rstar_bulk_load", |b| {
        b.iter_batched(
            || boxed.clone(),
            |boxed| black_box(RStarTree::bulk_load(boxed).size()),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_viewports(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_viewport");
    let entries = numbered(&scattered_extents(10_000, 0x5CA7_7E2D));
    let rstar_tree = RStarTree::bulk_load(to_rstar(&entries));
    let Ok(tessera_tree) = RTree::bulk_load(RTreeConfig::default(), entries) else {
        return;
    };
    let windows = viewports(256, 1_000.0, 0x00F1_E3D0);
    group.throughput(Throughput::Elements(windows.len() as u64));

    group.bench_function("tessera", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for w in &windows {
                let _ = tessera_tree.for_each_in_extent(*w, |_, _| hits += 1);
            }
            black_box(hits)
        })
    });
    group.bench_function("rstar", |b| {
        b.iter(|| {
            let hits: usize = windows
                .iter()
                .map(|w| rstar_tree.locate_in_envelope_intersecting(&envelope(*w)).count())
                .sum();
            black_box(hits)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_viewports);
criterion_main!(benches);
