// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line strings packed into one [`PackedBuffer`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use tessera_buffer::{BufferError, PackedBuffer, Span};
use tessera_index::Extent;

use crate::error::{GeomError, Result};
use crate::kind::GeometryKind;

/// One position: `dimension` numeric components, x and y first.
pub type Point = Vec<f64>;

/// An ordered sequence of points.
pub type LineString = Vec<Point>;

/// Bookkeeping for one live line string, keyed by its start offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct LineRecord {
    /// One past the last slot of the line string.
    end: usize,
}

/// A collection of line strings stored contiguously in a shared buffer.
///
/// Each line string occupies `points * dimension` slots and is identified by
/// the offset of its first slot. Offsets stay valid until the line string is
/// removed or [`set`](Self::set) moves it.
///
/// Point indices (`offset / dimension`) address the same buffer, so a renderer
/// can upload [`buffer`](Self::buffer) as a vertex array and
/// [`indices`](Self::indices) as a line-list index array.
#[derive(Clone)]
pub struct LineStringCollection {
    buffer: PackedBuffer<f64>,
    dimension: usize,
    lines: BTreeMap<usize, LineRecord>,
    revision: u64,
    indices: Option<(u64, Vec<u32>)>,
}

impl LineStringCollection {
    /// Empty collection with room for `capacity` points of `dimension` components.
    pub fn create_empty(capacity: usize, dimension: usize) -> Result<Self> {
        if dimension < 2 {
            return Err(GeomError::InvalidDimension(dimension));
        }
        Ok(Self {
            buffer: PackedBuffer::with_capacity(capacity.saturating_mul(dimension)),
            dimension,
            lines: BTreeMap::new(),
            revision: 0,
            indices: None,
        })
    }

    /// Build a collection from many line strings at once.
    ///
    /// `dimension` defaults to the component count of the first point (or 2
    /// when there are no points), and `capacity` defaults to the total number
    /// of points, leaving no spare room.
    pub fn pack<S, P>(
        lines: &[S],
        capacity: Option<usize>,
        dimension: Option<usize>,
    ) -> Result<Self>
    where
        S: AsRef<[P]>,
        P: AsRef<[f64]>,
    {
        let dimension = dimension.unwrap_or_else(|| {
            lines
                .first()
                .and_then(|line| line.as_ref().first())
                .map_or(2, |p| p.as_ref().len())
        });
        if dimension < 2 {
            return Err(GeomError::InvalidDimension(dimension));
        }
        let points: usize = lines.iter().map(|line| line.as_ref().len()).sum();
        let slots = capacity.unwrap_or(points).saturating_mul(dimension);
        let mut storage = Vec::with_capacity(slots);
        let mut records = BTreeMap::new();
        for line in lines {
            let line = line.as_ref();
            check_line(line, dimension)?;
            let offset = storage.len();
            let n = line.len() * dimension;
            if n > slots - offset {
                return Err(BufferError::Full {
                    requested: n,
                    largest_free: slots - offset,
                }
                .into());
            }
            storage.extend(line.iter().flat_map(|p| p.as_ref().iter().copied()));
            records.insert(offset, LineRecord { end: storage.len() });
        }
        let used = storage.len();
        storage.resize(slots, 0.0);
        log::debug!("packed {} line strings, {points} points", lines.len());
        Ok(Self {
            buffer: PackedBuffer::from_vec(storage, used)?,
            dimension,
            lines: records,
            revision: 0,
            indices: None,
        })
    }

    /// Components per point.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Always [`GeometryKind::LineString`].
    pub fn kind(&self) -> GeometryKind {
        GeometryKind::LineString
    }

    /// Number of live line strings.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if no line strings are stored.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Offsets of live line strings in ascending order.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.keys().copied()
    }

    /// True if a line string starts at `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.lines.contains_key(&offset)
    }

    /// Buffer slots occupied by the line string at `offset`.
    pub fn span(&self, offset: usize) -> Option<Span> {
        self.lines
            .get(&offset)
            .map(|record| Span::new(offset, record.end - offset))
    }

    /// The packed storage.
    pub fn buffer(&self) -> &PackedBuffer<f64> {
        &self.buffer
    }

    /// The packed storage, for consumers that acknowledge dirty ranges or
    /// build [`split32`](PackedBuffer::split32) copies.
    ///
    /// Allocating or releasing through this reference bypasses the
    /// collection's bookkeeping.
    pub fn buffer_mut(&mut self) -> &mut PackedBuffer<f64> {
        &mut self.buffer
    }

    /// Store `line` and return its offset.
    pub fn add<P: AsRef<[f64]>>(&mut self, line: &[P]) -> Result<usize> {
        self.check(line)?;
        let n = line.len() * self.dimension;
        let offset = self.buffer.allocate(n)?;
        self.write(offset, line)?;
        self.lines.insert(offset, LineRecord { end: offset + n });
        self.touch();
        Ok(offset)
    }

    /// The line string at `offset`.
    pub fn get(&self, offset: usize) -> Result<LineString> {
        Ok(self
            .coords(offset)?
            .chunks_exact(self.dimension)
            .map(<[f64]>::to_vec)
            .collect())
    }

    /// Flat coordinates of the line string at `offset`.
    pub fn coords(&self, offset: usize) -> Result<&[f64]> {
        let end = self.end_of(offset)?;
        Ok(&self.buffer.as_slice()[offset..end])
    }

    /// Replace the line string at `offset` and return its (possibly new) offset.
    ///
    /// With the same number of points the coordinates are overwritten in
    /// place, only that span is marked dirty, and `offset` is returned.
    /// Otherwise the old span is released and `line` is stored anew; if that
    /// fails, the old line string is kept untouched at `offset`.
    pub fn set<P: AsRef<[f64]>>(&mut self, offset: usize, line: &[P]) -> Result<usize> {
        let end = self.end_of(offset)?;
        self.check(line)?;
        let old = end - offset;
        let n = line.len() * self.dimension;
        if n == old {
            self.write(offset, line)?;
            self.touch();
            return Ok(offset);
        }
        self.buffer.remove(old, offset)?;
        let moved = match self.buffer.allocate(n) {
            Ok(moved) => moved,
            Err(err) => {
                // Released slots still hold the old coordinates.
                self.buffer.claim(old, offset)?;
                return Err(err.into());
            }
        };
        self.lines.remove(&offset);
        self.write(moved, line)?;
        self.lines.insert(moved, LineRecord { end: moved + n });
        self.touch();
        log::trace!("line string moved from {offset} to {moved}");
        Ok(moved)
    }

    /// Remove the line string at `offset`, freeing its slots for reuse.
    pub fn remove(&mut self, offset: usize) -> Result<()> {
        let end = self.end_of(offset)?;
        self.buffer.remove(end - offset, offset)?;
        self.lines.remove(&offset);
        self.touch();
        Ok(())
    }

    /// Bounding extent of every live point, over the first two components.
    pub fn extent(&self) -> Option<Extent<f64>> {
        self.lines
            .iter()
            .filter_map(|(&offset, record)| self.extent_of_span(offset, record.end))
            .reduce(|a, b| a.union(&b))
    }

    /// Bounding extent of the line string at `offset`.
    pub fn line_extent(&self, offset: usize) -> Result<Extent<f64>> {
        let end = self.end_of(offset)?;
        self.extent_of_span(offset, end)
            .ok_or(GeomError::NotFound(offset))
    }

    /// Line-list indices: a pair `(i, i + 1)` for every segment of every line
    /// string, where `i` is a point index into the buffer. Line strings appear
    /// in ascending offset order.
    ///
    /// The list is rebuilt only after the collection changed.
    pub fn indices(&mut self) -> Result<&[u32]> {
        let stale = self
            .indices
            .as_ref()
            .is_none_or(|(revision, _)| *revision != self.revision);
        if stale {
            let built = self.build_indices()?;
            log::trace!("rebuilt {} segment indices", built.len());
            self.indices = Some((self.revision, built));
        }
        Ok(self
            .indices
            .as_ref()
            .map(|(_, indices)| indices.as_slice())
            .unwrap_or_default())
    }

    /// Every live line string in ascending offset order.
    pub fn unpack(&self) -> Vec<LineString> {
        self.lines
            .iter()
            .map(|(&offset, record)| {
                self.buffer.as_slice()[offset..record.end]
                    .chunks_exact(self.dimension)
                    .map(<[f64]>::to_vec)
                    .collect()
            })
            .collect()
    }

    fn end_of(&self, offset: usize) -> Result<usize> {
        self.lines
            .get(&offset)
            .map(|record| record.end)
            .ok_or(GeomError::NotFound(offset))
    }

    fn check<P: AsRef<[f64]>>(&self, line: &[P]) -> Result<()> {
        check_line(line, self.dimension)
    }

    /// Copy `line` into the slots at `offset` and mark them dirty.
    fn write<P: AsRef<[f64]>>(&mut self, offset: usize, line: &[P]) -> Result<()> {
        let n = line.len() * self.dimension;
        let slots = &mut self.buffer.as_mut_slice()[offset..offset + n];
        for (slot, point) in slots.chunks_exact_mut(self.dimension).zip(line) {
            slot.copy_from_slice(point.as_ref());
        }
        self.buffer.mark_dirty(n, offset)?;
        Ok(())
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn extent_of_span(&self, offset: usize, end: usize) -> Option<Extent<f64>> {
        extent_of(self.buffer.as_slice()[offset..end].chunks_exact(self.dimension))
    }

    fn build_indices(&self) -> Result<Vec<u32>> {
        let mut out = Vec::new();
        for (&offset, record) in &self.lines {
            let last = u32::try_from(record.end / self.dimension - 1)
                .map_err(|_| GeomError::IndexOverflow)?;
            let first = u32::try_from(offset / self.dimension)
                .map_err(|_| GeomError::IndexOverflow)?;
            for i in first..last {
                out.extend([i, i + 1]);
            }
        }
        Ok(out)
    }
}

fn check_line<P: AsRef<[f64]>>(line: &[P], dimension: usize) -> Result<()> {
    if line.len() < GeometryKind::LineString.min_points() {
        return Err(GeomError::TooFewPoints { points: line.len() });
    }
    if let Some(found) = line
        .iter()
        .map(|p| p.as_ref().len())
        .find(|&found| found != dimension)
    {
        return Err(GeomError::DimensionMismatch {
            expected: dimension,
            found,
        });
    }
    Ok(())
}

impl core::fmt::Debug for LineStringCollection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineStringCollection")
            .field("dimension", &self.dimension)
            .field("lines", &self.lines.len())
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

/// Bounding extent of `points` over their first two components.
///
/// Returns `None` for an empty input or points with fewer than two components.
pub fn extent_of<I, P>(points: I) -> Option<Extent<f64>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[f64]>,
{
    let mut extent: Option<Extent<f64>> = None;
    for point in points {
        let &[x, y, ..] = point.as_ref() else {
            return None;
        };
        match extent.as_mut() {
            Some(e) => e.extend_point(x, y),
            None => extent = Some(Extent::from_point(x, y)),
        }
    }
    extent
}
