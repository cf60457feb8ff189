// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_benches::{clustered_extents, numbered, scattered_extents, viewports};
use tessera_index::{Extent, RTree, RTreeConfig, RTreeF32, RTreeF64, RTreeI64};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_build");
    for &count in &[1_000usize, 10_000] {
        let entries = numbered(&scattered_extents(count, 0xB11D_0000 + count as u64));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("insert_scattered_{count}"), |b| {
            b.iter(|| {
                let mut tree = RTreeF64::<u32>::new();
                for &(e, i) in &entries {
                    let _ = tree.insert(e, i);
                }
                black_box(tree.height())
            })
        });
        group.bench_function(format!("bulk_load_scattered_{count}"), |b| {
            b.iter_batched(
                || entries.clone(),
                |entries| {
                    let tree = RTree::bulk_load(RTreeConfig::default(), entries);
                    black_box(tree.map(|t| t.height()).unwrap_or(0))
                },
                BatchSize::LargeInput,
            )
        });
    }

    let clustered = numbered(&clustered_extents(16, 256, 120.0, 0xC1A5_7E55));
    group.throughput(Throughput::Elements(clustered.len() as u64));
    group.bench_function("insert_clustered_4096", |b| {
        b.iter(|| {
            let mut tree = RTreeF64::<u32>::new();
            for &(e, i) in &clustered {
                let _ = tree.insert(e, i);
            }
            black_box(tree.height())
        })
    });

    // Wider nodes trade split work for longer leaf scans.
    let entries = numbered(&scattered_extents(10_000, 0x0F11_0F11));
    for (min, max) in [(2, 4), (4, 9), (8, 16)] {
        let Ok(config) = RTreeConfig::new(min, max) else {
            continue;
        };
        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_function(format!("insert_fill_{min}_{max}"), |b| {
            b.iter(|| {
                let Ok(mut tree) = RTreeF64::<u32>::with_config(config) else {
                    return 0;
                };
                for &(e, i) in &entries {
                    let _ = tree.insert(e, i);
                }
                black_box(tree.height())
            })
        });
    }
    group.finish();
}

fn bench_viewport_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_viewport");
    let Ok(tree) = RTree::bulk_load(
        RTreeConfig::default(),
        numbered(&scattered_extents(10_000, 0x0DDB_A11C)),
    ) else {
        return;
    };
    for &side in &[250.0, 1_000.0, 4_000.0] {
        let windows = viewports(256, side, 0x5EED_0000 + side as u64);
        group.throughput(Throughput::Elements(windows.len() as u64));
        group.bench_function(format!("visit_side_{side}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for w in &windows {
                    let _ = tree.for_each_in_extent(*w, |_, _| hits += 1);
                }
                black_box(hits)
            })
        });
        group.bench_function(format!("collect_side_{side}"), |b| {
            b.iter(|| {
                let total: usize = windows
                    .iter()
                    .map(|w| tree.all_in_extent(*w).map_or(0, |v| v.len()))
                    .sum();
                black_box(total)
            })
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_remove");
    let entries = numbered(&scattered_extents(4096, 0xFACE_FEED));
    let Ok(tree) = RTree::bulk_load(RTreeConfig::default(), entries.clone()) else {
        return;
    };
    group.throughput(Throughput::Elements(entries.len() as u64 / 2));
    group.bench_function("remove_every_other_4096", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for (e, i) in entries.iter().step_by(2) {
                    let _ = tree.remove(*e, i);
                }
                black_box(tree.len())
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_scalar_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_scalars");
    let source = scattered_extents(4096, 0x5CA1_A125);
    let window = Extent::from_xywh(2_000.0, 2_000.0, 1_500.0, 1_500.0);
    group.throughput(Throughput::Elements(source.len() as u64));

    #[allow(clippy::cast_possible_truncation, reason = "world coordinates fit in f32 and i64")]
    let (as_f32, as_i64) = {
        let f = |e: &Extent<f64>| Extent::new(e.min_x as f32, e.min_y as f32, e.max_x as f32, e.max_y as f32);
        let i = |e: &Extent<f64>| Extent::new(e.min_x as i64, e.min_y as i64, e.max_x as i64, e.max_y as i64);
        (
            (numbered(&source.iter().map(f).collect::<Vec<_>>()), f(&window)),
            (numbered(&source.iter().map(i).collect::<Vec<_>>()), i(&window)),
        )
    };

    group.bench_function("insert_query_f32", |b| {
        b.iter(|| {
            let mut tree = RTreeF32::<u32>::new();
            for &(e, id) in &as_f32.0 {
                let _ = tree.insert(e, id);
            }
            black_box(tree.all_in_extent(as_f32.1).map_or(0, |v| v.len()))
        })
    });
    group.bench_function("insert_query_i64", |b| {
        b.iter(|| {
            let mut tree = RTreeI64::<u32>::new();
            for &(e, id) in &as_i64.0 {
                let _ = tree.insert(e, id);
            }
            black_box(tree.all_in_extent(as_i64.1).map_or(0, |v| v.len()))
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_viewport_queries,
    bench_remove,
    bench_scalar_types
);
criterion_main!(benches);
