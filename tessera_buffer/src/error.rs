// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for buffer operations.

/// Failures reported by [`PackedBuffer`](crate::PackedBuffer).
///
/// All of these leave the buffer exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// No free run or tail space can hold the request.
    ///
    /// The buffer never compacts, so this can happen while the total free space
    /// is larger than `requested`.
    #[error("buffer full: requested {requested} slots, largest contiguous free run is {largest_free}")]
    Full {
        /// Slots asked for.
        requested: usize,
        /// Largest contiguous free run at the time of the request.
        largest_free: usize,
    },
    /// Zero-slot allocations have no offset to hand out.
    #[error("cannot allocate zero slots")]
    ZeroSized,
    /// The span is out of bounds, or not entirely live (for removal) or
    /// entirely free (for claiming).
    #[error("invalid span of {size} slots at offset {offset}")]
    InvalidSpan {
        /// First slot of the rejected span.
        offset: usize,
        /// Slot count of the rejected span.
        size: usize,
    },
}

/// Result alias for buffer operations.
pub type Result<T> = core::result::Result<T, BufferError>;
