// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for geometry collections.

use tessera_buffer::BufferError;

/// Failures reported by [`LineStringCollection`](crate::LineStringCollection).
///
/// A failed call leaves the collection and its buffer as they were.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeomError {
    /// No live line string starts at this offset.
    #[error("no line string at offset {0}")]
    NotFound(usize),
    /// A line string needs at least two points.
    #[error("a line string needs at least 2 points, got {points}")]
    TooFewPoints {
        /// Number of points supplied.
        points: usize,
    },
    /// A point had the wrong number of components.
    #[error("expected points with {expected} components, found {found}")]
    DimensionMismatch {
        /// Components per point in this collection.
        expected: usize,
        /// Components in the offending point.
        found: usize,
    },
    /// Points need at least x and y.
    #[error("dimension must be at least 2, got {0}")]
    InvalidDimension(usize),
    /// A point index does not fit in 32 bits.
    #[error("point index exceeds u32::MAX")]
    IndexOverflow,
    /// The underlying buffer rejected the operation.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Result alias for collection operations.
pub type Result<T> = core::result::Result<T, GeomError>;
