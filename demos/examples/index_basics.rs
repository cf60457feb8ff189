// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree basics.
//!
//! Insert six extents, run range queries, remove one entry, and bulk load the
//! same data.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p tessera_demos --example index_basics`

use tessera_index::{Extent, RTree, RTreeConfig, RTreeF64};

fn main() {
    env_logger::init();

    let extents = [
        [0.0, 0.0, 1.0, 1.0],
        [1.0, 1.0, 4.0, 4.0],
        [2.0, 2.0, 3.0, 3.0],
        [-5.0, -5.0, -4.0, -4.0],
        [-4.0, -4.0, -1.0, -1.0],
        [-3.0, -3.0, -2.0, -2.0],
    ];
    let mut tree = RTreeF64::new();
    for (i, e) in extents.iter().enumerate() {
        tree.insert(Extent::from(*e), i).unwrap();
    }

    for q in [[2.0, 2.0, 3.0, 3.0], [-1.0, -1.0, 2.0, 2.0], [5.0, 5.0, 6.0, 6.0]] {
        let mut hits = tree.all_in_extent(Extent::from(q)).unwrap();
        hits.sort_unstable();
        println!("query {q:?} -> {hits:?}");
    }

    // Malformed extents are rejected and leave the tree untouched.
    let err = tree.insert(Extent::new(3.0, 0.0, 1.0, 1.0), 99).unwrap_err();
    println!("rejected: {err}");

    assert!(tree.remove(Extent::from(extents[4]), &4).unwrap());
    let mut hits = tree.all_in_extent(Extent::new(-1.0, -1.0, 2.0, 2.0)).unwrap();
    hits.sort_unstable();
    assert_eq!(hits, [0, 1, 2]);

    let entries = extents
        .iter()
        .enumerate()
        .map(|(i, e)| (Extent::from(*e), i))
        .collect();
    let packed = RTree::bulk_load(RTreeConfig::new(2, 4).unwrap(), entries).unwrap();
    println!("bulk loaded: {packed:?}, extent {:?}", packed.extent());
}
