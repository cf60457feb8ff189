// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Geom: line strings packed into a shared numeric buffer.
//!
//! [`LineStringCollection`] flattens each line string into a
//! [`PackedBuffer`](tessera_buffer::PackedBuffer) and returns the offset of
//! its first slot as a handle.
//!
//! - Add, get, replace, and remove line strings by offset.
//! - Replacing with the same number of points overwrites in place and marks
//!   only that span dirty; other replacements may move the line string.
//! - Compute the extent of everything stored, and a line-list index array
//!   pairing consecutive points for drawing.
//!
//! # Example
//!
//! ```rust
//! use tessera_geom::LineStringCollection;
//! use tessera_index::Extent;
//!
//! let mut lines = LineStringCollection::create_empty(16, 2).unwrap();
//! let a = lines.add(&[[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]).unwrap();
//! let b = lines.add(&[[5.0, 5.0], [6.0, 6.0]]).unwrap();
//!
//! assert_eq!(lines.get(b).unwrap(), vec![vec![5.0, 5.0], vec![6.0, 6.0]]);
//! assert_eq!(lines.extent(), Some(Extent::new(0.0, 0.0, 6.0, 6.0)));
//! assert_eq!(lines.indices().unwrap(), &[0, 1, 1, 2, 3, 4]);
//!
//! // Same length: updated in place.
//! assert_eq!(lines.set(a, &[[0.0, 1.0], [1.0, 2.0], [2.0, 1.0]]).unwrap(), a);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod collection;
pub mod error;
pub mod kind;

pub use collection::{LineString, LineStringCollection, Point, extent_of};
pub use error::{GeomError, Result};
pub use kind::GeometryKind;
