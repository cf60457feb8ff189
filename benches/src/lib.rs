// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seeded workloads shared by the Tessera benchmarks.
//!
//! Everything lives in a `WORLD × WORLD` square, the same coordinate range the
//! crate tests use, so numbers from different benches are comparable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_index::Extent;

/// Side of the square all generated geometry falls in.
pub const WORLD: f64 = 10_000.0;

/// Largest side of a generated extent.
pub const MAX_SIDE: f64 = 500.0;

/// Extents with a random corner in the world and sides up to [`MAX_SIDE`].
pub fn scattered_extents(count: usize, seed: u64) -> Vec<Extent<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..WORLD);
            let y = rng.gen_range(0.0..WORLD);
            let w = rng.gen_range(0.0..MAX_SIDE);
            let h = rng.gen_range(0.0..MAX_SIDE);
            Extent::from_xywh(x, y, w, h)
        })
        .collect()
}

/// Small extents packed around a few random centers, like labels in a city.
pub fn clustered_extents(clusters: usize, per_cluster: usize, spread: f64, seed: u64) -> Vec<Extent<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(clusters * per_cluster);
    for _ in 0..clusters {
        let cx = rng.gen_range(spread..WORLD - spread);
        let cy = rng.gen_range(spread..WORLD - spread);
        for _ in 0..per_cluster {
            let x = cx + rng.gen_range(-spread..spread);
            let y = cy + rng.gen_range(-spread..spread);
            out.push(Extent::from_xywh(x, y, 12.0, 12.0));
        }
    }
    out
}

/// Square query windows of the given side, fully inside the world.
pub fn viewports(count: usize, side: f64, seed: u64) -> Vec<Extent<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..WORLD - side);
            let y = rng.gen_range(0.0..WORLD - side);
            Extent::from_xywh(x, y, side, side)
        })
        .collect()
}

/// Random walks of 2 to 8 points, each starting anywhere in the world.
pub fn random_lines(count: usize, seed: u64) -> Vec<Vec<[f64; 2]>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let points = rng.gen_range(2..=8);
            let mut x = rng.gen_range(0.0..WORLD);
            let mut y = rng.gen_range(0.0..WORLD);
            (0..points)
                .map(|_| {
                    x += rng.gen_range(-20.0..20.0);
                    y += rng.gen_range(-20.0..20.0);
                    [x, y]
                })
                .collect()
        })
        .collect()
}

/// Allocation sizes between `min` and `max` slots, inclusive.
pub fn allocation_sizes(count: usize, min: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(min..=max)).collect()
}

/// Pair each extent with its position, ready for `RTree::bulk_load`.
pub fn numbered<T: Copy>(extents: &[Extent<T>]) -> Vec<(Extent<T>, u32)> {
    extents.iter().copied().zip(0_u32..).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_geometry_stays_in_the_world() {
        for e in scattered_extents(500, 1) {
            assert!(e.min_x >= 0.0 && e.min_y >= 0.0);
            assert!(e.max_x < WORLD + MAX_SIDE && e.max_y < WORLD + MAX_SIDE);
        }
        for v in viewports(100, 1000.0, 2) {
            assert!(v.min_x >= 0.0 && v.max_x <= WORLD);
            assert!(v.min_y >= 0.0 && v.max_y <= WORLD);
        }
        for line in random_lines(100, 3) {
            assert!((2..=8).contains(&line.len()));
        }
    }

    #[test]
    fn same_seed_same_workload() {
        assert_eq!(scattered_extents(64, 7), scattered_extents(64, 7));
        assert_ne!(scattered_extents(64, 7), scattered_extents(64, 8));
    }
}
