// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line strings kept in a packed collection and an R-tree side by side.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use tessera_buffer::SpanSet;
use tessera_geom::{LineString, LineStringCollection, extent_of};
use tessera_index::{Extent, IndexError, RTreeConfig, RTreeF64};

use crate::damage::Damage;
use crate::error::Result;

/// Change since the last commit.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Mark {
    Added,
    Updated { prev: Extent<f64> },
}

#[derive(Copy, Clone, Debug)]
struct Tracked {
    extent: Extent<f64>,
    mark: Option<Mark>,
}

/// Spatially indexed line strings.
///
/// Every line string lives in a [`LineStringCollection`] and is indexed by
/// its extent in an R-tree whose items are the collection offsets. A viewport
/// query returns offsets, which read back packed coordinates. The index is
/// updated eagerly; [`commit`](Self::commit) only reports what changed.
#[derive(Clone)]
pub struct LineStringSource {
    lines: LineStringCollection,
    index: RTreeF64<usize>,
    tracked: BTreeMap<usize, Tracked>,
    removed: Vec<Extent<f64>>,
}

impl LineStringSource {
    /// Empty source with room for `capacity` points of `dimension` components.
    pub fn new(capacity: usize, dimension: usize, config: RTreeConfig) -> Result<Self> {
        Ok(Self {
            lines: LineStringCollection::create_empty(capacity, dimension)?,
            index: RTreeF64::with_config(config)?,
            tracked: BTreeMap::new(),
            removed: Vec::new(),
        })
    }

    /// Pack `lines` and bulk load their extents in one go.
    ///
    /// Capacity and dimension follow [`LineStringCollection::pack`]. Every
    /// line string is reported as added by the first commit.
    pub fn from_lines<S, P>(
        lines: &[S],
        capacity: Option<usize>,
        dimension: Option<usize>,
        config: RTreeConfig,
    ) -> Result<Self>
    where
        S: AsRef<[P]>,
        P: AsRef<[f64]>,
    {
        for line in lines {
            check_line(line.as_ref())?;
        }
        let collection = LineStringCollection::pack(lines, capacity, dimension)?;
        let mut entries = Vec::with_capacity(collection.len());
        for offset in collection.offsets() {
            entries.push((collection.line_extent(offset)?, offset));
        }
        let tracked = entries
            .iter()
            .map(|&(extent, offset)| {
                let mark = Some(Mark::Added);
                (offset, Tracked { extent, mark })
            })
            .collect();
        Ok(Self {
            lines: collection,
            index: RTreeF64::bulk_load(config, entries)?,
            tracked,
            removed: Vec::new(),
        })
    }

    /// The packed line strings.
    pub fn collection(&self) -> &LineStringCollection {
        &self.lines
    }

    /// The spatial index over line-string offsets.
    pub fn index(&self) -> &RTreeF64<usize> {
        &self.index
    }

    /// Number of line strings.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// True if no line strings are stored.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Bounding extent of everything stored.
    pub fn extent(&self) -> Option<Extent<f64>> {
        self.index.extent()
    }

    /// Store and index `line`, returning its offset.
    pub fn add<P: AsRef<[f64]>>(&mut self, line: &[P]) -> Result<usize> {
        check_line(line)?;
        let offset = self.lines.add(line)?;
        let extent = self.lines.line_extent(offset)?;
        self.index.insert(extent, offset)?;
        self.tracked.insert(
            offset,
            Tracked {
                extent,
                mark: Some(Mark::Added),
            },
        );
        Ok(offset)
    }

    /// The line string at `offset`.
    pub fn get(&self, offset: usize) -> Result<LineString> {
        Ok(self.lines.get(offset)?)
    }

    /// Replace the line string at `offset`, returning its possibly new offset.
    ///
    /// The index entry is replaced by one for the new extent and offset.
    pub fn set<P: AsRef<[f64]>>(&mut self, offset: usize, line: &[P]) -> Result<usize> {
        check_line(line)?;
        let moved = self.lines.set(offset, line)?;
        let extent = self.lines.line_extent(moved)?;
        let Some(old) = self.tracked.remove(&offset) else {
            return Ok(moved);
        };
        let indexed = self.index.remove(old.extent, &offset)?;
        debug_assert!(indexed, "line string at {offset} missing from the index");
        self.index.insert(extent, moved)?;
        let mark = match old.mark {
            None => Some(Mark::Updated { prev: old.extent }),
            kept => kept,
        };
        self.tracked.insert(moved, Tracked { extent, mark });
        Ok(moved)
    }

    /// Remove the line string at `offset` from the collection and the index.
    pub fn remove(&mut self, offset: usize) -> Result<()> {
        self.lines.remove(offset)?;
        let Some(old) = self.tracked.remove(&offset) else {
            return Ok(());
        };
        let indexed = self.index.remove(old.extent, &offset)?;
        debug_assert!(indexed, "line string at {offset} missing from the index");
        match old.mark {
            Some(Mark::Added) => {}
            Some(Mark::Updated { prev }) => self.removed.push(prev),
            None => self.removed.push(old.extent),
        }
        Ok(())
    }

    /// Offsets of line strings whose extent intersects `extent`, ascending.
    pub fn query(&self, extent: Extent<f64>) -> Result<Vec<usize>> {
        let mut offsets = self.index.all_in_extent(extent)?;
        offsets.sort_unstable();
        Ok(offsets)
    }

    /// Line strings whose extent intersects `extent`, with their offsets.
    pub fn lines_in_extent(&self, extent: Extent<f64>) -> Result<Vec<(usize, LineString)>> {
        self.query(extent)?
            .into_iter()
            .map(|offset| Ok((offset, self.lines.get(offset)?)))
            .collect()
    }

    /// Line-list indices over the packed buffer, see
    /// [`LineStringCollection::indices`].
    pub fn indices(&mut self) -> Result<&[u32]> {
        Ok(self.lines.indices()?)
    }

    /// Buffer ranges written since the previous call.
    pub fn take_dirty(&mut self) -> SpanSet {
        self.lines.buffer_mut().take_dirty()
    }

    /// Report extents added, removed, and moved since the previous commit.
    ///
    /// A line string added and removed between two commits is not reported,
    /// and one that was updated but ends with its old extent is not reported
    /// as moved.
    pub fn commit(&mut self) -> Damage<f64> {
        let mut damage = Damage {
            removed: core::mem::take(&mut self.removed),
            ..Damage::default()
        };
        for tracked in self.tracked.values_mut() {
            match tracked.mark.take() {
                Some(Mark::Added) => damage.added.push(tracked.extent),
                Some(Mark::Updated { prev }) if prev != tracked.extent => {
                    damage.moved.push((prev, tracked.extent));
                }
                Some(Mark::Updated { .. }) | None => {}
            }
        }
        log::debug!(
            "commit: {} added, {} removed, {} moved",
            damage.added.len(),
            damage.removed.len(),
            damage.moved.len()
        );
        damage
    }
}

impl core::fmt::Debug for LineStringSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineStringSource")
            .field("lines", &self.tracked.len())
            .field("index", &self.index)
            .field("pending_removed", &self.removed.len())
            .finish_non_exhaustive()
    }
}

/// Reject lines whose extent the index would refuse, before anything is stored.
fn check_line<P: AsRef<[f64]>>(line: &[P]) -> Result<()> {
    match extent_of(line) {
        Some(extent) if !extent.is_valid() => {
            log::warn!("rejecting line string with non-comparable coordinates");
            Err(IndexError::InvalidExtent.into())
        }
        _ => Ok(()),
    }
}
