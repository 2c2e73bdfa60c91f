// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered map of half-open spans, backed by an arena AVL tree.
//!
//! Each entry is a span `[key, end)` carrying a `content` value. Entries are
//! ordered by `key` only; keeping spans disjoint is the caller's job.
//!
//! Nodes live in an arena and are addressed by [`NodeIdx`]. A handle stays
//! valid across rebalancing and across the removal of *other* nodes, so a
//! caller can hold on to "the node being worked on" while inserting and
//! deleting its neighbors.
//!
//! Handles are only meaningful for the map that returned them. Passing a
//! removed handle to any accessor panics in debug builds; a handle from
//! another map reads whatever occupies that slot, or panics if the slot is
//! out of range.

use alloc::vec::Vec;
use core::fmt::Debug;

/// Stable handle to a node in a [`RangeMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node<T, C> {
    key: T,
    end: T,
    content: C,
    parent: Option<NodeIdx>,
    left: Option<NodeIdx>,
    right: Option<NodeIdx>,
    height: u8,
}

/// Self-balancing ordered map from span start to `(end, content)`.
#[derive(Clone)]
pub struct RangeMap<T, C> {
    nodes: Vec<Node<T, C>>,
    free: Vec<NodeIdx>,
    root: Option<NodeIdx>,
    len: usize,
}

impl<T, C> Default for RangeMap<T, C> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }
}

impl<T: Ord + Copy, C> RangeMap<T, C> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove every entry and release the arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Exchange the contents of two maps.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// The `(key, end)` pair of a node.
    pub fn span(&self, idx: NodeIdx) -> (T, T) {
        let n = self.node(idx);
        (n.key, n.end)
    }

    /// Start of a node's span.
    pub fn key(&self, idx: NodeIdx) -> T {
        self.node(idx).key
    }

    /// End of a node's span.
    pub fn end(&self, idx: NodeIdx) -> T {
        self.node(idx).end
    }

    /// Content stored in a node.
    pub fn content(&self, idx: NodeIdx) -> &C {
        &self.node(idx).content
    }

    pub(crate) fn content_mut(&mut self, idx: NodeIdx) -> &mut C {
        &mut self.node_mut(idx).content
    }

    /// Move the start of a node. The new key must keep the node between its
    /// in-order neighbors.
    pub(crate) fn set_key(&mut self, idx: NodeIdx, key: T) {
        self.node_mut(idx).key = key;
    }

    pub(crate) fn set_end(&mut self, idx: NodeIdx, end: T) {
        self.node_mut(idx).end = end;
    }

    /// Insert a new span and return its handle.
    ///
    /// Entries with equal keys are placed after the existing ones. The span
    /// must not be empty (`key < end`); disjointness from other entries is
    /// not checked.
    pub fn insert(&mut self, key: T, end: T, content: C) -> NodeIdx {
        debug_assert!(key < end, "RangeMap::insert requires a non-empty span");
        let idx = self.alloc(Node {
            key,
            end,
            content,
            parent: None,
            left: None,
            right: None,
            height: 1,
        });
        let Some(mut cur) = self.root else {
            self.root = Some(idx);
            return idx;
        };
        loop {
            let go_left = key < self.node(cur).key;
            let child = if go_left {
                self.node(cur).left
            } else {
                self.node(cur).right
            };
            match child {
                Some(c) => cur = c,
                None => {
                    if go_left {
                        self.node_mut(cur).left = Some(idx);
                    } else {
                        self.node_mut(cur).right = Some(idx);
                    }
                    self.node_mut(idx).parent = Some(cur);
                    break;
                }
            }
        }
        self.rebalance_from(Some(cur));
        idx
    }

    /// Remove a node and return its content. The handle becomes invalid.
    pub fn remove(&mut self, idx: NodeIdx) -> C
    where
        C: Default,
    {
        let n = self.node(idx);
        let (parent, left, right, height) = (n.parent, n.left, n.right, n.height);
        let rebalance_start = match (left, right) {
            (Some(l), Some(r)) => {
                // The successor takes this node's place in the tree.
                let s = self.leftmost(r);
                let start = if s == r {
                    s
                } else {
                    // `s` sits somewhere below `r`, so it always has a parent.
                    let s_parent = self.node(s).parent.unwrap_or(r);
                    let s_right = self.node(s).right;
                    self.node_mut(s_parent).left = s_right;
                    if let Some(sr) = s_right {
                        self.node_mut(sr).parent = Some(s_parent);
                    }
                    self.node_mut(s).right = Some(r);
                    self.node_mut(r).parent = Some(s);
                    s_parent
                };
                self.node_mut(s).left = Some(l);
                self.node_mut(l).parent = Some(s);
                self.node_mut(s).parent = parent;
                self.node_mut(s).height = height;
                self.replace_child(parent, idx, Some(s));
                Some(start)
            }
            (child, None) | (None, child) => {
                if let Some(c) = child {
                    self.node_mut(c).parent = parent;
                }
                self.replace_child(parent, idx, child);
                parent
            }
        };
        self.rebalance_from(rebalance_start);
        let node = self.node_mut(idx);
        node.parent = None;
        node.left = None;
        node.right = None;
        // Live nodes have height >= 1; zero marks a freed slot.
        node.height = 0;
        let content = core::mem::take(&mut node.content);
        self.free.push(idx);
        self.len -= 1;
        content
    }

    /// Node whose key equals `key`.
    pub fn find(&self, key: T) -> Option<NodeIdx> {
        let mut cur = self.root;
        while let Some(n) = cur {
            let k = self.node(n).key;
            if key == k {
                return Some(n);
            }
            cur = if key < k {
                self.node(n).left
            } else {
                self.node(n).right
            };
        }
        None
    }

    /// Node with the greatest key strictly less than `key`.
    pub fn find_smaller(&self, key: T) -> Option<NodeIdx> {
        self.descend(|k| k < key, true)
    }

    /// Node with the greatest key less than or equal to `key`.
    pub fn find_exact_smaller(&self, key: T) -> Option<NodeIdx> {
        self.descend(|k| k <= key, true)
    }

    /// Node with the smallest key strictly greater than `key`.
    pub fn find_bigger(&self, key: T) -> Option<NodeIdx> {
        self.descend(|k| k > key, false)
    }

    /// Node with the smallest key greater than or equal to `key`.
    pub fn find_exact_bigger(&self, key: T) -> Option<NodeIdx> {
        self.descend(|k| k >= key, false)
    }

    /// Node with the smallest key.
    pub fn first(&self) -> Option<NodeIdx> {
        self.root.map(|r| self.leftmost(r))
    }

    /// Node with the greatest key.
    pub fn last(&self) -> Option<NodeIdx> {
        let mut cur = self.root?;
        while let Some(r) = self.node(cur).right {
            cur = r;
        }
        Some(cur)
    }

    /// In-order successor.
    pub fn next(&self, idx: NodeIdx) -> Option<NodeIdx> {
        if let Some(r) = self.node(idx).right {
            return Some(self.leftmost(r));
        }
        let mut cur = idx;
        while let Some(p) = self.node(cur).parent {
            if self.node(p).left == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// In-order predecessor.
    pub fn prev(&self, idx: NodeIdx) -> Option<NodeIdx> {
        if let Some(mut cur) = self.node(idx).left {
            while let Some(r) = self.node(cur).right {
                cur = r;
            }
            return Some(cur);
        }
        let mut cur = idx;
        while let Some(p) = self.node(cur).parent {
            if self.node(p).right == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// Iterate `(key, end, &content)` in key order.
    pub fn iter(&self) -> Spans<'_, T, C> {
        Spans {
            map: self,
            next: self.first(),
        }
    }

    /// Visit every entry in key order with mutable access to its span and
    /// content. The visitor must not reorder entries.
    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut T, &mut T, &mut C)) {
        let mut cur = self.first();
        while let Some(i) = cur {
            let n = self.node_mut(i);
            f(&mut n.key, &mut n.end, &mut n.content);
            cur = self.next(i);
        }
    }

    /// Panics if the tree links, heights, balance, or key order are broken.
    pub(crate) fn check_structure(&self) {
        if let Some(r) = self.root {
            assert!(self.node(r).parent.is_none(), "root must not have a parent");
            let count = self.check_subtree(r, None, None);
            assert_eq!(count, self.len, "live node count must match len");
        } else {
            assert_eq!(self.len, 0, "empty tree must have len 0");
        }
    }

    fn check_subtree(&self, idx: NodeIdx, lo: Option<T>, hi: Option<T>) -> usize {
        let n = self.node(idx);
        if let Some(lo) = lo {
            assert!(n.key >= lo, "left subtree key out of order");
        }
        if let Some(hi) = hi {
            assert!(n.key <= hi, "right subtree key out of order");
        }
        let mut count = 1;
        for child in [n.left, n.right].into_iter().flatten() {
            assert_eq!(
                self.node(child).parent,
                Some(idx),
                "child must point back at its parent"
            );
        }
        if let Some(l) = n.left {
            count += self.check_subtree(l, lo, Some(n.key));
        }
        if let Some(r) = n.right {
            count += self.check_subtree(r, Some(n.key), hi);
        }
        let (hl, hr) = (self.height(n.left), self.height(n.right));
        assert_eq!(n.height, 1 + hl.max(hr), "stale node height");
        assert!(hl.abs_diff(hr) <= 1, "AVL balance violated");
        count
    }

    fn descend(&self, accept: impl Fn(T) -> bool, toward_right: bool) -> Option<NodeIdx> {
        let mut cur = self.root;
        let mut best = None;
        while let Some(n) = cur {
            let node = self.node(n);
            if accept(node.key) {
                best = Some(n);
                cur = if toward_right { node.right } else { node.left };
            } else {
                cur = if toward_right { node.left } else { node.right };
            }
        }
        best
    }

    fn alloc(&mut self, node: Node<T, C>) -> NodeIdx {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.get()] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    #[inline]
    fn node(&self, idx: NodeIdx) -> &Node<T, C> {
        let node = &self.nodes[idx.get()];
        debug_assert!(node.height != 0, "stale NodeIdx: the node was removed");
        node
    }

    #[inline]
    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<T, C> {
        let node = &mut self.nodes[idx.get()];
        debug_assert!(node.height != 0, "stale NodeIdx: the node was removed");
        node
    }

    fn leftmost(&self, mut cur: NodeIdx) -> NodeIdx {
        while let Some(l) = self.node(cur).left {
            cur = l;
        }
        cur
    }

    fn height(&self, idx: Option<NodeIdx>) -> u8 {
        idx.map(|i| self.node(i).height).unwrap_or(0)
    }

    fn update_height(&mut self, idx: NodeIdx) {
        let n = self.node(idx);
        let h = 1 + self.height(n.left).max(self.height(n.right));
        self.node_mut(idx).height = h;
    }

    fn balance(&self, idx: NodeIdx) -> i16 {
        let n = self.node(idx);
        i16::from(self.height(n.left)) - i16::from(self.height(n.right))
    }

    fn replace_child(&mut self, parent: Option<NodeIdx>, old: NodeIdx, new: Option<NodeIdx>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = self.node_mut(p);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, x: NodeIdx) -> NodeIdx {
        let Some(y) = self.node(x).right else {
            return x;
        };
        let parent = self.node(x).parent;
        let y_left = self.node(y).left;

        self.node_mut(x).right = y_left;
        if let Some(b) = y_left {
            self.node_mut(b).parent = Some(x);
        }
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));
        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right(&mut self, x: NodeIdx) -> NodeIdx {
        let Some(y) = self.node(x).left else {
            return x;
        };
        let parent = self.node(x).parent;
        let y_right = self.node(y).right;

        self.node_mut(x).left = y_right;
        if let Some(b) = y_right {
            self.node_mut(b).parent = Some(x);
        }
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));
        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Restore heights and AVL balance on the path from `cur` to the root.
    fn rebalance_from(&mut self, mut cur: Option<NodeIdx>) {
        while let Some(n) = cur {
            self.update_height(n);
            let bf = self.balance(n);
            let top = if bf > 1 {
                if let Some(l) = self.node(n).left
                    && self.balance(l) < 0
                {
                    self.rotate_left(l);
                }
                self.rotate_right(n)
            } else if bf < -1 {
                if let Some(r) = self.node(n).right
                    && self.balance(r) > 0
                {
                    self.rotate_right(r);
                }
                self.rotate_left(n)
            } else {
                n
            };
            cur = self.node(top).parent;
        }
    }
}

impl<T: Ord + Copy, C: PartialEq> PartialEq for RangeMap<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Ord + Copy, C: Eq> Eq for RangeMap<T, C> {}

impl<T: Ord + Copy + Debug, C: Debug> Debug for RangeMap<T, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, e, c)| (k..e, c)))
            .finish()
    }
}

impl<'a, T: Ord + Copy, C> IntoIterator for &'a RangeMap<T, C> {
    type Item = (T, T, &'a C);
    type IntoIter = Spans<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the spans of a [`RangeMap`].
pub struct Spans<'a, T, C> {
    map: &'a RangeMap<T, C>,
    next: Option<NodeIdx>,
}

impl<'a, T: Ord + Copy, C> Iterator for Spans<'a, T, C> {
    type Item = (T, T, &'a C);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        self.next = self.map.next(idx);
        let n = self.map.node(idx);
        Some((n.key, n.end, &n.content))
    }
}

impl<T, C> Debug for Spans<'_, T, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Spans")
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn keys(map: &RangeMap<i64, ()>) -> Vec<i64> {
        map.iter().map(|(k, _, _)| k).collect()
    }

    fn filled(n: i64) -> RangeMap<i64, ()> {
        let mut m = RangeMap::new();
        for i in 0..n {
            // Interleave so inserts hit both rotation directions.
            let k = (i * 37) % n;
            m.insert(k * 10, k * 10 + 5, ());
            m.check_structure();
        }
        m
    }

    #[test]
    fn insert_keeps_order_and_balance() {
        let m = filled(101);
        assert_eq!(m.len(), 101);
        assert_eq!(keys(&m), (0..101).map(|k| k * 10).collect::<Vec<_>>());
        // 101 nodes fit in an AVL tree of height at most 1.44 log2(n).
        assert!(m.height(m.root) <= 10);
    }

    #[test]
    fn neighbor_searches() {
        let m = filled(10);
        let key_of = |i: Option<NodeIdx>| i.map(|i| m.key(i));
        assert_eq!(key_of(m.find(30)), Some(30));
        assert_eq!(key_of(m.find(31)), None);
        assert_eq!(key_of(m.find_smaller(30)), Some(20));
        assert_eq!(key_of(m.find_exact_smaller(30)), Some(30));
        assert_eq!(key_of(m.find_exact_smaller(34)), Some(30));
        assert_eq!(key_of(m.find_bigger(30)), Some(40));
        assert_eq!(key_of(m.find_exact_bigger(30)), Some(30));
        assert_eq!(key_of(m.find_exact_bigger(31)), Some(40));
        assert_eq!(key_of(m.find_smaller(0)), None);
        assert_eq!(key_of(m.find_bigger(90)), None);
        assert_eq!(key_of(m.first()), Some(0));
        assert_eq!(key_of(m.last()), Some(90));
    }

    #[test]
    fn next_prev_walk() {
        let m = filled(20);
        let mut fwd = vec![];
        let mut cur = m.first();
        while let Some(i) = cur {
            fwd.push(m.key(i));
            cur = m.next(i);
        }
        let mut back = vec![];
        let mut cur = m.last();
        while let Some(i) = cur {
            back.push(m.key(i));
            cur = m.prev(i);
        }
        back.reverse();
        assert_eq!(fwd, back);
        assert_eq!(fwd.len(), 20);
    }

    #[test]
    fn remove_keeps_handles_stable() {
        let mut m: RangeMap<i64, u32> = RangeMap::new();
        let handles: Vec<_> = (0..64).map(|i| m.insert(i, i + 1, i as u32)).collect();
        // Remove every other node, including ones with two children.
        for h in handles.iter().step_by(2) {
            m.remove(*h);
            m.check_structure();
        }
        for (i, h) in handles.iter().enumerate().skip(1).step_by(2) {
            assert_eq!(m.key(*h), i as i64);
            assert_eq!(*m.content(*h), i as u32);
        }
        assert_eq!(m.len(), 32);
    }

    #[test]
    fn remove_all_then_reuse_slots() {
        let mut m: RangeMap<i64, ()> = RangeMap::new();
        let hs: Vec<_> = (0..16).map(|i| m.insert(i * 2, i * 2 + 1, ())).collect();
        for h in hs.into_iter().rev() {
            m.remove(h);
            m.check_structure();
        }
        assert!(m.is_empty());
        let arena = m.nodes.len();
        m.insert(7, 8, ());
        assert_eq!(m.nodes.len(), arena, "freed slots are reused");
        assert_eq!(keys(&m), vec![7]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "stale NodeIdx")]
    fn removed_handle_is_rejected() {
        let mut m: RangeMap<i64, ()> = RangeMap::new();
        let keep = m.insert(0, 1, ());
        let gone = m.insert(2, 3, ());
        m.remove(gone);
        assert_eq!(m.key(keep), 0);
        let _ = m.key(gone);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-empty span")]
    fn empty_span_insert_is_rejected() {
        let mut m: RangeMap<i64, ()> = RangeMap::new();
        m.insert(5, 5, ());
    }

    #[test]
    fn equality_ignores_arena_layout() {
        let mut a: RangeMap<i64, ()> = RangeMap::new();
        let mut b: RangeMap<i64, ()> = RangeMap::new();
        for k in [1, 5, 9] {
            a.insert(k, k + 1, ());
        }
        let junk = b.insert(100, 101, ());
        for k in [9, 1, 5] {
            b.insert(k, k + 1, ());
        }
        assert_ne!(a, b);
        b.remove(junk);
        assert_eq!(a, b);
    }

    #[test]
    fn swap_and_clear() {
        let mut a = filled(5);
        let mut b = RangeMap::new();
        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.len(), 5);
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
        assert!(b.first().is_none());
    }
}
