// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree over extents with quadratic splits and condense-on-delete.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::RTreeConfig;
use crate::error::{IndexError, Result};
use crate::types::{Extent, Scalar, ScalarAcc, area, cmp_t, enlargement};

/// R-tree mapping extents to caller-chosen items.
///
/// Items are opaque to the tree: it stores a copy of each one next to its
/// extent and hands clones back from queries. Inserting the same item twice
/// stores two entries.
#[derive(Clone)]
pub struct RTree<T: Scalar, P> {
    config: RTreeConfig,
    root: Option<NodeIdx>,
    arena: Vec<RNode<T, P>>,
    free_nodes: Vec<NodeIdx>,
    len: usize,
    height: usize,
}

#[derive(Clone)]
struct RNode<T: Scalar, P> {
    extent: Extent<T>,
    kind: NodeKind<T, P>,
}

#[derive(Clone)]
enum NodeKind<T: Scalar, P> {
    Leaf(Vec<Entry<T, P>>),
    Branch(Vec<NodeIdx>),
}

#[derive(Clone)]
struct Entry<T, P> {
    extent: Extent<T>,
    item: P,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar, P> RNode<T, P> {
    fn fill(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(entries) => entries.len(),
            NodeKind::Branch(children) => children.len(),
        }
    }
}

/// Outcome of a quadratic split: positions of the inputs sent to each side.
struct Split<T> {
    left: Vec<usize>,
    left_extent: Extent<T>,
    right: Vec<usize>,
    right_extent: Extent<T>,
}

impl<T> Split<T> {
    /// Distribute `items` (in the order the extents were given) to the two sides.
    fn partition<E>(&self, items: Vec<E>) -> (Vec<E>, Vec<E>) {
        let mut to_right = vec![false; items.len()];
        for &i in &self.right {
            to_right[i] = true;
        }
        let mut left = Vec::with_capacity(self.left.len());
        let mut right = Vec::with_capacity(self.right.len());
        for (item, r) in items.into_iter().zip(to_right) {
            if r {
                right.push(item);
            } else {
                left.push(item);
            }
        }
        (left, right)
    }
}

impl<T: Scalar, P> Default for RTree<T, P> {
    fn default() -> Self {
        Self::empty(RTreeConfig::default())
    }
}

impl<T: Scalar, P> RTree<T, P> {
    /// Create an empty tree with the default fill bounds (4..=9).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with explicit fill bounds.
    pub fn with_config(config: RTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    fn empty(config: RTreeConfig) -> Self {
        Self {
            config,
            root: None,
            arena: Vec::new(),
            free_nodes: Vec::new(),
            len: 0,
            height: 0,
        }
    }

    /// Build a packed tree from many entries at once.
    ///
    /// Entries are sorted into vertical slices by center x, each slice is
    /// sorted by center y and cut into evenly sized nodes, and the same pass
    /// is repeated on the resulting nodes until one root remains. Every node
    /// respects the fill bounds, and the result answers queries exactly like
    /// a tree built by repeated [`insert`](Self::insert).
    pub fn bulk_load(config: RTreeConfig, entries: Vec<(Extent<T>, P)>) -> Result<Self> {
        let mut tree = Self::with_config(config)?;
        if entries.iter().any(|(extent, _)| !extent.is_valid()) {
            log::warn!("rejecting bulk load containing a malformed extent");
            return Err(IndexError::InvalidExtent);
        }
        if entries.is_empty() {
            return Ok(tree);
        }
        tree.len = entries.len();
        let leaves = entries
            .into_iter()
            .map(|(extent, item)| (extent, Entry { extent, item }))
            .collect();
        let mut level = tree.pack(leaves, NodeKind::Leaf);
        let mut height = 1;
        while level.len() > 1 {
            level = tree.pack(level, NodeKind::Branch);
            height += 1;
        }
        tree.root = level.first().map(|&(_, idx)| idx);
        tree.height = height;
        log::debug!(
            "bulk loaded {} entries into {} nodes, height {height}",
            tree.len,
            tree.arena.len()
        );
        Ok(tree)
    }

    /// Fill bounds in use.
    pub fn config(&self) -> RTreeConfig {
        self.config
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node levels from root to leaves; zero when empty.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bounding extent of every stored entry.
    pub fn extent(&self) -> Option<Extent<T>> {
        self.root.map(|root| self.node(root).extent)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.free_nodes.clear();
        self.len = 0;
        self.height = 0;
    }

    /// Insert `item` under `extent`.
    ///
    /// Descends along the child needing the least area enlargement, appends to
    /// the chosen leaf, and splits overflowing nodes on the way back up. A
    /// split root makes the tree one level taller.
    pub fn insert(&mut self, extent: Extent<T>, item: P) -> Result<()> {
        check_extent(&extent)?;
        self.insert_entry(Entry { extent, item });
        self.len += 1;
        Ok(())
    }

    /// Call `f` for every entry whose extent intersects `query`.
    ///
    /// Nodes are pruned by their bounding extent; each leaf entry is then
    /// tested on its own extent. Touching edges count as intersecting.
    pub fn for_each_in_extent<F>(&self, query: Extent<T>, f: F) -> Result<()>
    where
        F: FnMut(&Extent<T>, &P),
    {
        check_extent(&query)?;
        self.visit(Some(&query), f);
        Ok(())
    }

    /// Call `f` for every entry.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Extent<T>, &P),
    {
        self.visit(None, f);
    }

    fn visit<F>(&self, query: Option<&Extent<T>>, mut f: F)
    where
        F: FnMut(&Extent<T>, &P),
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let node = self.node(idx);
            if query.is_some_and(|q| !node.extent.intersects(q)) {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf(entries) => {
                    for e in entries {
                        if query.is_none_or(|q| e.extent.intersects(q)) {
                            f(&e.extent, &e.item);
                        }
                    }
                }
                NodeKind::Branch(children) => stack.extend(children.iter().copied()),
            }
        }
    }

    fn node(&self, idx: NodeIdx) -> &RNode<T, P> {
        &self.arena[idx.get()]
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut RNode<T, P> {
        &mut self.arena[idx.get()]
    }

    fn alloc_node(&mut self, extent: Extent<T>, kind: NodeKind<T, P>) -> NodeIdx {
        let node = RNode { extent, kind };
        if let Some(idx) = self.free_nodes.pop() {
            self.arena[idx.get()] = node;
            idx
        } else {
            self.arena.push(node);
            NodeIdx::new(self.arena.len() - 1)
        }
    }

    fn release(&mut self, idx: NodeIdx) {
        self.node_mut(idx).kind = NodeKind::Leaf(Vec::new());
        self.free_nodes.push(idx);
    }

    fn refresh_extent(&mut self, idx: NodeIdx) {
        let extent = match &self.node(idx).kind {
            NodeKind::Leaf(entries) => union_all(entries.iter().map(|e| e.extent)),
            NodeKind::Branch(children) => union_all(children.iter().map(|&c| self.node(c).extent)),
        };
        if let Some(extent) = extent {
            self.node_mut(idx).extent = extent;
        }
    }

    fn insert_entry(&mut self, entry: Entry<T, P>) {
        let Some(root) = self.root else {
            let idx = self.alloc_node(entry.extent, NodeKind::Leaf(vec![entry]));
            self.root = Some(idx);
            self.height = 1;
            return;
        };
        if let Some(sibling) = self.insert_node(root, entry) {
            let extent = self.node(root).extent.union(&self.node(sibling).extent);
            let new_root = self.alloc_node(extent, NodeKind::Branch(vec![root, sibling]));
            self.root = Some(new_root);
            self.height += 1;
            log::debug!("root split; height now {}", self.height);
        }
    }

    /// Insert below `idx`; returns the new right sibling if `idx` split.
    fn insert_node(&mut self, idx: NodeIdx, entry: Entry<T, P>) -> Option<NodeIdx> {
        let max = self.config.max_entries;
        let extent = entry.extent;
        let node = self.node_mut(idx);
        node.extent = node.extent.union(&extent);
        if let NodeKind::Leaf(entries) = &mut node.kind {
            entries.push(entry);
            let overflow = entries.len() > max;
            return overflow.then(|| self.split(idx));
        }
        // Branches are never empty, so a subtree is always found.
        let (slot, child) = self.choose_subtree(idx, &extent)?;
        let sibling = self.insert_node(child, entry)?;
        if let NodeKind::Branch(children) = &mut self.node_mut(idx).kind {
            children.insert(slot + 1, sibling);
            if children.len() > max {
                return Some(self.split(idx));
            }
        }
        None
    }

    /// Child of branch `idx` needing the least enlargement to cover `extent`.
    ///
    /// Ties go to the smaller resulting area, then to the child with fewer entries.
    fn choose_subtree(&self, idx: NodeIdx, extent: &Extent<T>) -> Option<(usize, NodeIdx)> {
        let NodeKind::Branch(children) = &self.node(idx).kind else {
            return None;
        };
        let mut best: Option<(usize, NodeIdx, ScalarAcc<T>, ScalarAcc<T>, usize)> = None;
        for (slot, &child) in children.iter().enumerate() {
            let node = self.node(child);
            let grow = enlargement(&node.extent, extent);
            let size = area(&node.extent);
            let fill = node.fill();
            let better = best.is_none_or(|(_, _, best_grow, best_size, best_fill)| {
                cmp_t(&grow, &best_grow)
                    .then_with(|| cmp_t(&size, &best_size))
                    .then(fill.cmp(&best_fill))
                    .is_lt()
            });
            if better {
                best = Some((slot, child, grow, size, fill));
            }
        }
        best.map(|(slot, child, ..)| (slot, child))
    }

    /// Split overflowing node `idx` in place; returns the new right half.
    fn split(&mut self, idx: NodeIdx) -> NodeIdx {
        let min = self.config.min_entries;
        let kind = core::mem::replace(&mut self.node_mut(idx).kind, NodeKind::Branch(Vec::new()));
        let (left, left_extent, right, right_extent) = match kind {
            NodeKind::Leaf(entries) => {
                let extents: Vec<_> = entries.iter().map(|e| e.extent).collect();
                let split = quadratic_split(&extents, min);
                let (l, r) = split.partition(entries);
                (
                    NodeKind::Leaf(l),
                    split.left_extent,
                    NodeKind::Leaf(r),
                    split.right_extent,
                )
            }
            NodeKind::Branch(children) => {
                let extents: Vec<_> = children.iter().map(|&c| self.node(c).extent).collect();
                let split = quadratic_split(&extents, min);
                let (l, r) = split.partition(children);
                (
                    NodeKind::Branch(l),
                    split.left_extent,
                    NodeKind::Branch(r),
                    split.right_extent,
                )
            }
        };
        let node = self.node_mut(idx);
        node.kind = left;
        node.extent = left_extent;
        let sibling = self.alloc_node(right_extent, right);
        log::trace!(
            "split node {} into {} + {}",
            idx.get(),
            self.node(idx).fill(),
            self.node(sibling).fill()
        );
        sibling
    }

    /// Pack `(extent, element)` pairs into nodes of one level.
    fn pack<E>(
        &mut self,
        mut items: Vec<(Extent<T>, E)>,
        make: fn(Vec<E>) -> NodeKind<T, P>,
    ) -> Vec<(Extent<T>, NodeIdx)> {
        let max = self.config.max_entries;
        let groups = items.len().div_ceil(max);
        let mut slices = 1_usize;
        while slices * slices < groups {
            slices += 1;
        }
        items.sort_by(|a, b| cmp_t(&a.0.center().0, &b.0.center().0));
        let mut out = Vec::with_capacity(groups);
        for mut slice in split_even(items, slices) {
            slice.sort_by(|a, b| cmp_t(&a.0.center().1, &b.0.center().1));
            let count = slice.len().div_ceil(max);
            for group in split_even(slice, count) {
                let Some(extent) = union_all(group.iter().map(|(e, _)| *e)) else {
                    continue;
                };
                let kind = make(group.into_iter().map(|(_, e)| e).collect());
                out.push((extent, self.alloc_node(extent, kind)));
            }
        }
        out
    }
}

impl<T: Scalar, P: Clone> RTree<T, P> {
    /// Every stored item, in no particular order.
    pub fn all(&self) -> Vec<P> {
        let mut out = Vec::with_capacity(self.len);
        self.visit(None, |_, item| out.push(item.clone()));
        out
    }

    /// Items whose own extent intersects `query`, in no particular order.
    ///
    /// An empty tree yields an empty list; a malformed `query` is an error.
    pub fn all_in_extent(&self, query: Extent<T>) -> Result<Vec<P>> {
        let mut out = Vec::new();
        self.for_each_in_extent(query, |_, item| out.push(item.clone()))?;
        Ok(out)
    }
}

impl<T: Scalar, P: PartialEq> RTree<T, P> {
    /// Remove one entry equal to `(extent, item)`. Returns whether one was found.
    ///
    /// Nodes left under-full are dissolved and their entries reinserted, and a
    /// root with a single child is replaced by that child.
    pub fn remove(&mut self, extent: Extent<T>, item: &P) -> Result<bool> {
        check_extent(&extent)?;
        let Some(root) = self.root else {
            return Ok(false);
        };
        let mut orphans = Vec::new();
        if !self.remove_below(root, &extent, item, &mut orphans) {
            return Ok(false);
        }
        self.len -= 1;
        self.shrink_root();
        if !orphans.is_empty() {
            log::trace!("reinserting {} orphaned entries", orphans.len());
        }
        for entry in orphans {
            self.insert_entry(entry);
        }
        Ok(true)
    }

    fn remove_below(
        &mut self,
        idx: NodeIdx,
        extent: &Extent<T>,
        item: &P,
        orphans: &mut Vec<Entry<T, P>>,
    ) -> bool {
        let node = self.node_mut(idx);
        if !node.extent.contains(extent) {
            return false;
        }
        let children = match &mut node.kind {
            NodeKind::Leaf(entries) => {
                let Some(pos) = entries
                    .iter()
                    .position(|e| e.extent == *extent && e.item == *item)
                else {
                    return false;
                };
                entries.remove(pos);
                self.refresh_extent(idx);
                return true;
            }
            NodeKind::Branch(children) => children.clone(),
        };
        for (slot, child) in children.into_iter().enumerate() {
            if !self.remove_below(child, extent, item, orphans) {
                continue;
            }
            if self.node(child).fill() < self.config.min_entries {
                if let NodeKind::Branch(children) = &mut self.node_mut(idx).kind {
                    children.remove(slot);
                }
                self.dissolve(child, orphans);
            }
            self.refresh_extent(idx);
            return true;
        }
        false
    }

    /// Free the subtree at `idx`, collecting its entries.
    fn dissolve(&mut self, idx: NodeIdx, orphans: &mut Vec<Entry<T, P>>) {
        let kind = core::mem::replace(&mut self.node_mut(idx).kind, NodeKind::Leaf(Vec::new()));
        self.free_nodes.push(idx);
        match kind {
            NodeKind::Leaf(entries) => orphans.extend(entries),
            NodeKind::Branch(children) => {
                for child in children {
                    self.dissolve(child, orphans);
                }
            }
        }
    }

    fn shrink_root(&mut self) {
        while let Some(root) = self.root {
            let next = match &self.node(root).kind {
                NodeKind::Leaf(entries) if entries.is_empty() => None,
                NodeKind::Branch(children) if children.len() == 1 => Some(children[0]),
                _ => return,
            };
            self.release(root);
            self.root = next;
            self.height -= 1;
        }
    }
}

impl<T: Scalar, P> Debug for RTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("min_entries", &self.config.min_entries)
            .field("max_entries", &self.config.max_entries)
            .field("len", &self.len)
            .field("height", &self.height)
            .field("arena_nodes", &self.arena.len())
            .field("free_nodes", &self.free_nodes.len())
            .finish_non_exhaustive()
    }
}

fn check_extent<T: Scalar>(extent: &Extent<T>) -> Result<()> {
    if extent.is_valid() {
        Ok(())
    } else {
        log::warn!("rejecting malformed extent {extent:?}");
        Err(IndexError::InvalidExtent)
    }
}

fn union_all<T: Scalar>(mut extents: impl Iterator<Item = Extent<T>>) -> Option<Extent<T>> {
    let first = extents.next()?;
    Some(extents.fold(first, |acc, e| acc.union(&e)))
}

/// Cut `items` into `parts` runs whose lengths differ by at most one.
fn split_even<E>(items: Vec<E>, parts: usize) -> Vec<Vec<E>> {
    let parts = parts.max(1);
    let base = items.len() / parts;
    let extra = items.len() % parts;
    let mut it = items.into_iter();
    (0..parts)
        .map(|i| it.by_ref().take(base + usize::from(i < extra)).collect())
        .collect()
}

/// Quadratic split of an overflowing node.
///
/// Seeds are the pair wasting the most area when grouped together. The
/// remaining entries are then taken one at a time, most decisive first, and
/// given to the side whose extent grows least (ties: smaller area, then fewer
/// entries). Once a side needs every remaining entry to reach `min_entries`,
/// it gets them all.
fn quadratic_split<T: Scalar>(extents: &[Extent<T>], min_entries: usize) -> Split<T> {
    let (a, b) = pick_seeds(extents);
    let mut left = vec![a];
    let mut right = vec![b];
    let mut left_extent = extents[a];
    let mut right_extent = extents[b];
    let mut rest: Vec<usize> = (0..extents.len()).filter(|&i| i != a && i != b).collect();
    while !rest.is_empty() {
        if left.len() + rest.len() <= min_entries {
            for &i in &rest {
                left_extent = left_extent.union(&extents[i]);
            }
            left.append(&mut rest);
            break;
        }
        if right.len() + rest.len() <= min_entries {
            for &i in &rest {
                right_extent = right_extent.union(&extents[i]);
            }
            right.append(&mut rest);
            break;
        }
        let i = rest.swap_remove(pick_next(extents, &rest, &left_extent, &right_extent));
        let to_left = cmp_t(
            &enlargement(&left_extent, &extents[i]),
            &enlargement(&right_extent, &extents[i]),
        )
        .then_with(|| cmp_t(&area(&left_extent), &area(&right_extent)))
        .then(left.len().cmp(&right.len()))
        .is_le();
        if to_left {
            left.push(i);
            left_extent = left_extent.union(&extents[i]);
        } else {
            right.push(i);
            right_extent = right_extent.union(&extents[i]);
        }
    }
    Split {
        left,
        left_extent,
        right,
        right_extent,
    }
}

fn pick_seeds<T: Scalar>(extents: &[Extent<T>]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut worst: Option<ScalarAcc<T>> = None;
    for (i, a) in extents.iter().enumerate() {
        for (j, b) in extents.iter().enumerate().skip(i + 1) {
            let waste = area(&a.union(b)) - area(a) - area(b);
            if worst.is_none_or(|w| waste > w) {
                worst = Some(waste);
                seeds = (i, j);
            }
        }
    }
    seeds
}

/// Position in `rest` of the entry with the strongest preference for one side.
fn pick_next<T: Scalar>(
    extents: &[Extent<T>],
    rest: &[usize],
    left: &Extent<T>,
    right: &Extent<T>,
) -> usize {
    let mut best = 0;
    let mut best_diff: Option<ScalarAcc<T>> = None;
    for (pos, &i) in rest.iter().enumerate() {
        let dl = enlargement(left, &extents[i]);
        let dr = enlargement(right, &extents[i]);
        let diff = if dl > dr { dl - dr } else { dr - dl };
        if best_diff.is_none_or(|d| diff > d) {
            best_diff = Some(diff);
            best = pos;
        }
    }
    best
}

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64<P> = RTree<i64, P>;

/// R-tree with f32 coordinates and f64 metrics.
pub type RTreeF32<P> = RTree<f32, P>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64<P> = RTree<f64, P>;

#[cfg(test)]
impl<T: Scalar, P> RTree<T, P> {
    /// Walk the whole tree and assert its structural invariants.
    fn check_invariants(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.len, 0);
            assert_eq!(self.height, 0);
            return;
        };
        let mut count = 0;
        self.check_node(root, 1, true, &mut count);
        assert_eq!(count, self.len, "entry count mismatch");
    }

    fn check_node(&self, idx: NodeIdx, depth: usize, is_root: bool, count: &mut usize) {
        let node = self.node(idx);
        let fill = node.fill();
        assert!(fill <= self.config.max_entries, "node {idx:?} overfull: {fill}");
        if !is_root {
            assert!(fill >= self.config.min_entries, "node {idx:?} underfull: {fill}");
        }
        let tight = match &node.kind {
            NodeKind::Leaf(entries) => {
                assert_eq!(depth, self.height, "leaf at wrong depth");
                *count += entries.len();
                union_all(entries.iter().map(|e| e.extent))
            }
            NodeKind::Branch(children) => {
                assert!(depth < self.height, "branch at leaf depth");
                for &c in children {
                    self.check_node(c, depth + 1, false, count);
                }
                union_all(children.iter().map(|&c| self.node(c).extent))
            }
        };
        assert_eq!(tight, Some(node.extent), "stale extent on {idx:?}");
    }
}
