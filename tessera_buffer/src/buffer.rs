// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed buffer: fixed storage, first-fit allocation, dirty ranges.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{BufferError, Result};
use crate::span::{Span, SpanSet};
use crate::usage::BufferUsage;

/// Fixed-capacity flat store of numeric slots.
///
/// Slots `[0, len)` hold live allocations and the free runs left behind by
/// removals; slots `[len, capacity)` are untouched tail. Together with the
/// free list these always partition the whole storage.
#[derive(Clone)]
pub struct PackedBuffer<T = f64> {
    storage: Vec<T>,
    len: usize,
    free: SpanSet,
    dirty: SpanSet,
    usage: BufferUsage,
    split32: Option<Split32>,
}

/// Cached high/low `f32` split of the storage with its own dirty ranges.
#[derive(Clone, Debug, Default)]
struct Split32 {
    values: Vec<f32>,
    dirty: SpanSet,
}

impl<T: Copy + Default> PackedBuffer<T> {
    /// Create an empty buffer of `capacity` default-initialized slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(vec![T::default(); capacity], 0)
    }
}

impl<T: Copy> PackedBuffer<T> {
    /// Wrap pre-filled storage whose first `used` slots are live.
    ///
    /// The used prefix starts out dirty so the first consumer sync picks it up.
    pub fn from_vec(storage: Vec<T>, used: usize) -> Result<Self> {
        if used > storage.len() {
            return Err(BufferError::InvalidSpan {
                offset: 0,
                size: used,
            });
        }
        Ok(Self::from_parts(storage, used))
    }

    fn from_parts(storage: Vec<T>, used: usize) -> Self {
        let mut dirty = SpanSet::new();
        dirty.insert(Span::new(0, used));
        Self {
            storage,
            len: used,
            free: SpanSet::new(),
            dirty,
            usage: BufferUsage::default(),
            split32: None,
        }
    }

    /// Set the upload-frequency hint.
    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    /// The upload-frequency hint.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// High-water mark: one past the last slot that may be live.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free runs below [`len`](Self::len), in ascending order.
    pub fn free_spans(&self) -> &SpanSet {
        &self.free
    }

    /// Total free slots, counting the tail.
    pub fn free_slots(&self) -> usize {
        self.free.total() + (self.capacity() - self.len)
    }

    /// Largest allocation that would currently succeed.
    pub fn largest_free(&self) -> usize {
        self.free.largest().max(self.capacity() - self.len)
    }

    /// Reserve `n` contiguous slots and return their offset.
    ///
    /// Free runs are searched first-fit in ascending offset order; an oversized
    /// run is split and its remainder stays free. Only when no run fits is the
    /// tail used. Live allocations are never moved, so a fragmented buffer can
    /// report [`BufferError::Full`] while holding more free slots than `n`.
    pub fn allocate(&mut self, n: usize) -> Result<usize> {
        if n == 0 {
            return Err(BufferError::ZeroSized);
        }
        if let Some(offset) = self.free.take_first_fit(n) {
            log::trace!("reused {n} slots at {offset}");
            return Ok(offset);
        }
        match self.len.checked_add(n) {
            Some(end) if end <= self.capacity() => {
                let offset = self.len;
                self.len = end;
                log::trace!("extended by {n} slots at {offset}");
                Ok(offset)
            }
            _ => {
                let largest_free = self.largest_free();
                log::warn!(
                    "allocation of {n} slots failed: {} free, largest run {largest_free}",
                    self.free_slots()
                );
                Err(BufferError::Full {
                    requested: n,
                    largest_free,
                })
            }
        }
    }

    /// Release the `n` slots at `offset`.
    ///
    /// The run coalesces with free neighbours on both sides; a run that reaches
    /// [`len`](Self::len) is folded back into the tail. Releasing anything that
    /// is not entirely live fails with [`BufferError::InvalidSpan`].
    pub fn remove(&mut self, n: usize, offset: usize) -> Result<()> {
        let span = self.live_span(n, offset)?;
        self.free.insert(span);
        if let Some(last) = self.free.last()
            && last.end() == self.len
        {
            self.len = last.offset;
            self.free.pop();
        }
        log::trace!("released {n} slots at {offset}");
        Ok(())
    }

    /// Reserve exactly the `n` slots at `offset`.
    ///
    /// The slots must all be free, either inside one free run or past
    /// [`len`](Self::len); otherwise this fails with
    /// [`BufferError::InvalidSpan`] and nothing changes. Callers use this to
    /// take back a run they just released.
    pub fn claim(&mut self, n: usize, offset: usize) -> Result<()> {
        if n == 0 {
            return Err(BufferError::ZeroSized);
        }
        let invalid = BufferError::InvalidSpan { offset, size: n };
        let end = match offset.checked_add(n) {
            Some(end) if end <= self.capacity() => end,
            _ => return Err(invalid),
        };
        let span = Span::new(offset, n);
        if offset >= self.len {
            self.free.insert(Span::new(self.len, offset - self.len));
            self.len = end;
        } else if end > self.len || !self.free.take(span) {
            return Err(invalid);
        }
        log::trace!("claimed {n} slots at {offset}");
        Ok(())
    }

    /// Record `[offset, offset + n)` as changed since the last sync.
    ///
    /// Writers that mutate through [`as_mut_slice`](Self::as_mut_slice) call
    /// this so consumers can re-read only what changed.
    pub fn mark_dirty(&mut self, n: usize, offset: usize) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        let span = Span::new(offset, n);
        if offset.checked_add(n).is_none_or(|end| end > self.len) {
            return Err(BufferError::InvalidSpan { offset, size: n });
        }
        self.dirty.insert(span);
        if let Some(split) = self.split32.as_mut() {
            split.dirty.insert(span);
        }
        Ok(())
    }

    /// Ranges changed since the last [`take_dirty`](Self::take_dirty).
    pub fn dirty(&self) -> &SpanSet {
        &self.dirty
    }

    /// Acknowledge a sync: return the dirty ranges and clear them.
    pub fn take_dirty(&mut self) -> SpanSet {
        core::mem::take(&mut self.dirty)
    }

    /// Call `f(start, end)` for each dirty range in ascending order.
    pub fn for_each_dirty_range<F: FnMut(usize, usize)>(&self, mut f: F) {
        for span in &self.dirty {
            f(span.offset, span.end());
        }
    }

    /// Call `f(start, end)` for each maximal run of non-free slots below
    /// [`len`](Self::len).
    pub fn for_each_range<F: FnMut(usize, usize)>(&self, mut f: F) {
        let mut cursor = 0;
        for span in &self.free {
            if span.offset > cursor {
                f(cursor, span.offset);
            }
            cursor = span.end();
        }
        if cursor < self.len {
            f(cursor, self.len);
        }
    }

    /// Backing storage for bulk reads.
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Backing storage for bulk writes. Pair writes with
    /// [`mark_dirty`](Self::mark_dirty).
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage
    }

    fn live_span(&self, n: usize, offset: usize) -> Result<Span> {
        let span = Span::new(offset, n);
        let in_bounds = offset.checked_add(n).is_some_and(|end| end <= self.len);
        if n == 0 || !in_bounds || self.free.overlaps(span) {
            return Err(BufferError::InvalidSpan { offset, size: n });
        }
        Ok(span)
    }
}

impl PackedBuffer<f64> {
    /// Storage split into interleaved `(high, low)` `f32` pairs.
    ///
    /// `high` is the nearest `f32` and `low` the remaining error, which lets
    /// 32-bit shader pipelines recover most of the `f64` precision. The split is
    /// cached and only the ranges dirtied since the previous call are redone.
    pub fn split32(&mut self) -> &[f32] {
        let capacity = self.storage.len();
        let split = self.split32.get_or_insert_with(|| {
            log::debug!("building split32 cache for {capacity} slots");
            let mut dirty = SpanSet::new();
            dirty.insert(Span::new(0, capacity));
            Split32 {
                values: vec![0.0; 2 * capacity],
                dirty,
            }
        });
        for span in &split.dirty {
            for i in span.offset..span.end() {
                let (high, low) = split_f64(self.storage[i]);
                split.values[2 * i] = high;
                split.values[2 * i + 1] = low;
            }
        }
        split.dirty.clear();
        &split.values
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Narrowing to f32 is the point; the low half carries the lost bits."
)]
fn split_f64(value: f64) -> (f32, f32) {
    let high = value as f32;
    let low = (value - f64::from(high)) as f32;
    (high, low)
}

impl<T> core::fmt::Debug for PackedBuffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PackedBuffer")
            .field("capacity", &self.storage.len())
            .field("len", &self.len)
            .field("free_runs", &self.free.len())
            .field("dirty_runs", &self.dirty.len())
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}
