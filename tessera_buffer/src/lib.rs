// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Buffer: a fixed-capacity packed numeric buffer.
//!
//! [`PackedBuffer`] stores many variable-length runs of numbers (typically
//! flattened coordinates) in one flat allocation and hands out integer offsets
//! as stable handles.
//!
//! - Allocate runs first-fit from a coalescing free list, falling back to the
//!   unused tail.
//! - Release runs; neighbouring free runs merge, and runs at the end return to
//!   the tail.
//! - Track dirty ranges so consumers (for example a GPU upload step) can
//!   re-read only what changed, then acknowledge with [`PackedBuffer::take_dirty`].
//!
//! The buffer never compacts or moves live data. Fragmentation is therefore
//! observable: an allocation may fail with [`BufferError::Full`] even when the
//! total free space would suffice.
//!
//! # Example
//!
//! ```rust
//! use tessera_buffer::{BufferError, PackedBuffer};
//!
//! let mut buf = PackedBuffer::<f64>::with_capacity(8);
//! let a = buf.allocate(4).unwrap();
//! let b = buf.allocate(4).unwrap();
//! buf.as_mut_slice()[b..b + 4].copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
//! buf.mark_dirty(4, b).unwrap();
//!
//! // Free the first run and reuse part of it.
//! buf.remove(4, a).unwrap();
//! assert_eq!(buf.allocate(2), Ok(0));
//!
//! // Two free slots remain, but not contiguous with anything larger.
//! assert!(matches!(buf.allocate(3), Err(BufferError::Full { .. })));
//!
//! let dirty: Vec<_> = buf.take_dirty().iter().collect();
//! assert_eq!(dirty.len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod buffer;
pub mod error;
pub mod span;
pub mod usage;

pub use buffer::PackedBuffer;
pub use error::{BufferError, Result};
pub use span::{Span, SpanSet};
pub use usage::BufferUsage;
