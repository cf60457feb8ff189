// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Index: a generic 2D R-tree over axis-aligned extents.
//!
//! - Insert `(extent, item)` pairs one at a time, or build a packed tree with
//!   [`RTree::bulk_load`].
//! - Query every item whose extent intersects a rectangle. Edges are
//!   inclusive, so touching extents match.
//! - Remove an entry by its extent and item; under-full nodes are dissolved
//!   and their entries reinserted.
//!
//! Nodes hold between `min_entries` and `max_entries` children (4 and 9 by
//! default, see [`RTreeConfig`]). Overflowing nodes are split with the
//! quadratic algorithm, and splits propagate up to the root, so all leaves
//! stay at the same depth.
//!
//! The tree is generic over the scalar type `T`. Area metrics are computed in a
//! widened accumulator (f32→f64, f64→f64, i64→i128).
//!
//! # Example
//!
//! ```rust
//! use tessera_index::{Extent, RTreeF64};
//!
//! let mut tree = RTreeF64::new();
//! tree.insert(Extent::new(0.0, 0.0, 1.0, 1.0), "a").unwrap();
//! tree.insert(Extent::new(1.0, 1.0, 4.0, 4.0), "b").unwrap();
//! tree.insert(Extent::new(-5.0, -5.0, -4.0, -4.0), "c").unwrap();
//!
//! let mut hits = tree.all_in_extent(Extent::new(0.5, 0.5, 2.0, 2.0)).unwrap();
//! hits.sort();
//! assert_eq!(hits, ["a", "b"]);
//!
//! // Malformed extents are rejected rather than stored.
//! assert!(tree.insert(Extent::new(2.0, 0.0, 1.0, 1.0), "bad").is_err());
//! ```
//!
//! ### Float semantics
//!
//! Extents with a NaN coordinate are treated as malformed and rejected with
//! [`IndexError::InvalidExtent`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod rtree;
pub mod types;

pub use config::RTreeConfig;
pub use error::{IndexError, Result};
pub use rtree::{RTree, RTreeF32, RTreeF64, RTreeI64};
pub use types::{Extent, Scalar, area, enlargement};
