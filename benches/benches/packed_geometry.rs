// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_benches::{allocation_sizes, random_lines};
use tessera_buffer::PackedBuffer;
use tessera_geom::LineStringCollection;
use tessera_index::{Extent, RTreeConfig};
use tessera_source::LineStringSource;

fn bench_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_buffer");
    let sizes = allocation_sizes(4096, 2, 31, 0xB0FF_E4B0);
    group.throughput(Throughput::Elements(sizes.len() as u64));
    group.bench_function("allocate_remove_churn_4096", |b| {
        b.iter_batched(
            || PackedBuffer::<f64>::with_capacity(1 << 16),
            |mut buf| {
                let mut live = Vec::with_capacity(sizes.len());
                for (i, &n) in sizes.iter().enumerate() {
                    if let Ok(offset) = buf.allocate(n) {
                        live.push((offset, n));
                    }
                    // Free every third allocation to keep the free list busy.
                    if i % 3 == 2 && !live.is_empty() {
                        let (offset, n) = live.swap_remove(live.len() / 2);
                        let _ = buf.remove(n, offset);
                    }
                }
                black_box(buf.free_spans().len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_string_collection");
    for &count in &[1024usize, 8192] {
        let lines = random_lines(count, 0x11AE_5781_0000_0001);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("pack_n{}", count), |b| {
            b.iter(|| {
                let packed = LineStringCollection::pack(&lines, None, None);
                black_box(packed.map(|c| c.len()).unwrap_or(0));
            })
        });
        group.bench_function(format!("indices_n{}", count), |b| {
            b.iter_batched(
                || LineStringCollection::pack(&lines, None, None),
                |packed| {
                    let Ok(mut packed) = packed else {
                        return;
                    };
                    black_box(packed.indices().map(<[u32]>::len).unwrap_or(0));
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_string_source");
    let lines = random_lines(8192, 0x11AE_5781_0000_0002);
    let points: usize = lines.iter().map(Vec::len).sum();
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("add_commit_8192", |b| {
        b.iter_batched(
            || LineStringSource::new(points, 2, RTreeConfig::default()),
            |source| {
                let Ok(mut source) = source else {
                    return;
                };
                for line in &lines {
                    let _ = source.add(line);
                }
                black_box(source.commit().added.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("from_lines_8192", |b| {
        b.iter(|| {
            let source = LineStringSource::from_lines(&lines, None, None, RTreeConfig::default());
            black_box(source.map(|s| s.len()).unwrap_or(0));
        })
    });

    let Ok(source) = LineStringSource::from_lines(&lines, None, None, RTreeConfig::default())
    else {
        return;
    };
    let viewport = Extent::<f64>::from_xywh(4000.0, 4000.0, 1500.0, 1000.0);
    group.bench_function("lines_in_viewport", |b| {
        b.iter(|| {
            let hits = source.lines_in_extent(viewport).map_or(0, |v| v.len());
            black_box(hits);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_buffer, bench_collection, bench_source);
criterion_main!(benches);
