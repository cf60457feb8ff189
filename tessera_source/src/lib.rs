// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Source: spatially indexed line strings.
//!
//! [`LineStringSource`] wires the pieces together the way a map renderer uses
//! them: line strings are packed into a
//! [`LineStringCollection`](tessera_geom::LineStringCollection), each offset
//! is indexed under its extent in an R-tree, and a viewport query returns the
//! offsets to draw.
//!
//! - Add, replace, and remove line strings; the index follows every change.
//! - Query by extent for offsets or for the line strings themselves.
//! - Batch changes with [`LineStringSource::commit`] and receive coarse
//!   [`Damage`] (added, removed, and moved extents).
//!
//! # Example
//!
//! ```rust
//! use tessera_index::{Extent, RTreeConfig};
//! use tessera_source::LineStringSource;
//!
//! let mut source = LineStringSource::new(64, 2, RTreeConfig::default()).unwrap();
//! let road = source.add(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]).unwrap();
//! let river = source.add(&[[50.0, 50.0], [60.0, 40.0]]).unwrap();
//! let _ = source.commit();
//!
//! assert_eq!(source.query(Extent::new(5.0, -1.0, 6.0, 1.0)).unwrap(), vec![road]);
//!
//! // Moving the river reports a damaged extent pair.
//! let river = source.set(river, &[[55.0, 50.0], [65.0, 40.0]]).unwrap();
//! let damage = source.commit();
//! assert_eq!(damage.moved.len(), 1);
//! assert_eq!(source.query(Extent::new(64.0, 40.0, 65.0, 41.0)).unwrap(), vec![river]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod damage;
pub mod error;
pub mod source;

pub use damage::Damage;
pub use error::{Result, SourceError};
pub use source::LineStringSource;
