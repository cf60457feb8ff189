// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for tree operations.

/// Failures reported by [`RTree`](crate::RTree).
///
/// The tree is left unchanged by any failed call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// An extent had `min > max` on some axis, or a NaN coordinate.
    #[error("malformed extent: min must not exceed max on either axis")]
    InvalidExtent,
    /// Fill bounds violate `2 <= min_entries <= max_entries / 2`.
    #[error("invalid fill bounds: min_entries {min_entries}, max_entries {max_entries}")]
    InvalidConfig {
        /// Rejected lower bound.
        min_entries: usize,
        /// Rejected upper bound.
        max_entries: usize,
    },
}

/// Result alias for tree operations.
pub type Result<T> = core::result::Result<T, IndexError>;
