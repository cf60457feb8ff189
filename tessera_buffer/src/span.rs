// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Half-open slot spans and an ordered, coalescing set of them.

use alloc::vec::Vec;

/// A half-open range of buffer slots: `[offset, offset + size)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// First slot of the span.
    pub offset: usize,
    /// Number of slots in the span.
    pub size: usize,
}

impl Span {
    /// Create a span of `size` slots starting at `offset`.
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// One past the last slot of the span.
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    /// True if the span covers no slots.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Ordered set of disjoint, non-adjacent spans.
///
/// Inserting a span merges it with every span it overlaps or touches, so the
/// set always holds the minimal number of maximal runs. Used for both the free
/// list and the dirty ranges of a [`PackedBuffer`](crate::PackedBuffer).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanSet {
    spans: Vec<Span>,
}

impl SpanSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Number of maximal runs in the set.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True if the set covers no slots.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate runs in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = Span> + '_ {
        self.spans.iter().copied()
    }

    /// The run with the highest offset, if any.
    pub fn last(&self) -> Option<Span> {
        self.spans.last().copied()
    }

    /// Total number of slots covered.
    pub fn total(&self) -> usize {
        self.spans.iter().map(|s| s.size).sum()
    }

    /// Size of the largest run, or zero when empty.
    pub fn largest(&self) -> usize {
        self.spans.iter().map(|s| s.size).max().unwrap_or(0)
    }

    /// Remove every run.
    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Add `span`, coalescing with overlapping and adjacent runs.
    pub fn insert(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        let end = span.end();
        // Runs in `lo..hi` overlap or touch the new span.
        let lo = self.spans.partition_point(|s| s.end() < span.offset);
        let hi = self.spans.partition_point(|s| s.offset <= end);
        if lo == hi {
            self.spans.insert(lo, span);
            return;
        }
        let start = self.spans[lo].offset.min(span.offset);
        let stop = self.spans[hi - 1].end().max(end);
        self.spans[lo] = Span::new(start, stop - start);
        self.spans.drain(lo + 1..hi);
    }

    /// True if any run shares at least one slot with `span`.
    pub fn overlaps(&self, span: Span) -> bool {
        if span.is_empty() {
            return false;
        }
        let i = self.spans.partition_point(|s| s.end() <= span.offset);
        self.spans.get(i).is_some_and(|s| s.offset < span.end())
    }

    /// True if `span` lies entirely inside a single run.
    pub fn contains(&self, span: Span) -> bool {
        let i = self.spans.partition_point(|s| s.end() <= span.offset);
        self.spans
            .get(i)
            .is_some_and(|s| s.offset <= span.offset && span.end() <= s.end())
    }

    /// First-fit: carve `size` slots from the front of the lowest run that is
    /// large enough and return their offset.
    pub fn take_first_fit(&mut self, size: usize) -> Option<usize> {
        let i = self.spans.iter().position(|s| s.size >= size)?;
        let run = &mut self.spans[i];
        let offset = run.offset;
        if run.size == size {
            self.spans.remove(i);
        } else {
            run.offset += size;
            run.size -= size;
        }
        Some(offset)
    }

    /// Carve `span` out of the run containing it, splitting the run if
    /// needed. Returns false, leaving the set unchanged, if no single run
    /// contains `span`.
    pub fn take(&mut self, span: Span) -> bool {
        if span.is_empty() || !self.contains(span) {
            return false;
        }
        let i = self.spans.partition_point(|s| s.end() <= span.offset);
        let run = self.spans[i];
        let before = Span::new(run.offset, span.offset - run.offset);
        let after = Span::new(span.end(), run.end() - span.end());
        match (before.is_empty(), after.is_empty()) {
            (true, true) => {
                self.spans.remove(i);
            }
            (false, true) => self.spans[i] = before,
            (true, false) => self.spans[i] = after,
            (false, false) => {
                self.spans[i] = before;
                self.spans.insert(i + 1, after);
            }
        }
        true
    }

    /// Remove and return the last run.
    pub fn pop(&mut self) -> Option<Span> {
        self.spans.pop()
    }
}

impl<'a> IntoIterator for &'a SpanSet {
    type Item = &'a Span;
    type IntoIter = core::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn runs(set: &SpanSet) -> Vec<(usize, usize)> {
        set.iter().map(|s| (s.offset, s.size)).collect()
    }

    #[test]
    fn insert_keeps_runs_sorted() {
        let mut set = SpanSet::new();
        set.insert(Span::new(20, 5));
        set.insert(Span::new(0, 2));
        set.insert(Span::new(10, 3));
        assert_eq!(runs(&set), vec![(0, 2), (10, 3), (20, 5)]);
        assert_eq!(set.total(), 10);
        assert_eq!(set.largest(), 5);
    }

    #[test]
    fn insert_coalesces_adjacent_on_both_sides() {
        let mut set = SpanSet::new();
        set.insert(Span::new(0, 4));
        set.insert(Span::new(8, 4));
        set.insert(Span::new(4, 4));
        assert_eq!(runs(&set), vec![(0, 12)]);
    }

    #[test]
    fn insert_swallows_overlapped_runs() {
        let mut set = SpanSet::new();
        set.insert(Span::new(2, 2));
        set.insert(Span::new(6, 1));
        set.insert(Span::new(10, 2));
        set.insert(Span::new(3, 6));
        assert_eq!(runs(&set), vec![(2, 7), (10, 2)]);
    }

    #[test]
    fn empty_span_is_ignored() {
        let mut set = SpanSet::new();
        set.insert(Span::new(5, 0));
        assert!(set.is_empty());
        assert!(!set.overlaps(Span::new(5, 0)));
    }

    #[test]
    fn overlap_and_containment() {
        let mut set = SpanSet::new();
        set.insert(Span::new(10, 10));
        assert!(set.overlaps(Span::new(5, 6)));
        assert!(set.overlaps(Span::new(19, 4)));
        assert!(!set.overlaps(Span::new(5, 5)));
        assert!(!set.overlaps(Span::new(20, 5)));
        assert!(set.contains(Span::new(12, 3)));
        assert!(!set.contains(Span::new(8, 3)));
    }

    #[test]
    fn first_fit_splits_the_lowest_fitting_run() {
        let mut set = SpanSet::new();
        set.insert(Span::new(0, 2));
        set.insert(Span::new(10, 6));
        set.insert(Span::new(30, 8));
        assert_eq!(set.take_first_fit(4), Some(10));
        assert_eq!(runs(&set), vec![(0, 2), (14, 2), (30, 8)]);
        assert_eq!(set.take_first_fit(2), Some(0));
        assert_eq!(runs(&set), vec![(14, 2), (30, 8)]);
        assert_eq!(set.take_first_fit(9), None);
    }

    #[test]
    fn take_carves_from_a_single_run() {
        let mut set = SpanSet::new();
        set.insert(Span::new(10, 10));
        assert!(set.take(Span::new(12, 3)));
        assert_eq!(runs(&set), vec![(10, 2), (15, 5)]);
        assert!(set.take(Span::new(10, 2)));
        assert!(set.take(Span::new(18, 2)));
        assert_eq!(runs(&set), vec![(15, 3)]);
        assert!(!set.take(Span::new(14, 3)));
        assert!(set.take(Span::new(15, 3)));
        assert!(set.is_empty());
    }
}
