// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched damage returned by [`LineStringSource::commit`](crate::LineStringSource::commit).

use alloc::vec::Vec;

use tessera_index::Extent;

/// Extents that changed between two commits.
#[derive(Clone, Debug, PartialEq)]
pub struct Damage<T> {
    /// Extents of line strings added since the last commit.
    pub added: Vec<Extent<T>>,
    /// Extents of committed line strings removed since the last commit.
    pub removed: Vec<Extent<T>>,
    /// Committed line strings whose extent changed: (old, new).
    pub moved: Vec<(Extent<T>, Extent<T>)>,
}

impl<T> Default for Damage<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            moved: Vec::new(),
        }
    }
}

impl<T: Copy + PartialOrd> Damage<T> {
    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Smallest extent covering every damaged extent, or `None` if empty.
    pub fn union(&self) -> Option<Extent<T>> {
        self.added
            .iter()
            .chain(&self.removed)
            .copied()
            .chain(self.moved.iter().flat_map(|&(a, b)| [a, b]))
            .reduce(|acc, e| acc.union(&e))
    }
}
