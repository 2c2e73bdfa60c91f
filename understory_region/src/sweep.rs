// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional span sweep shared by every level of a region.
//!
//! A region is a [`RangeMap`] of Y-bands whose content is a [`RangeMap`] of
//! X-runs whose content is `()`. The same sweep merges an operand into a
//! target at both levels: at the band level the per-span work recurses into
//! the X maps through [`Content`], at the run level it bottoms out in `()`.
//!
//! After every structural change the touched node is coalesced with equal,
//! touching neighbors, so each level stays in its unique minimal form.

use crate::map::{NodeIdx, RangeMap};

/// What was left after carving an operand out of a span's content.
#[derive(Debug)]
pub(crate) struct Carved<C> {
    /// The removed part, if requested and non-empty.
    pub(crate) overlap: Option<C>,
    /// True when nothing is left in the span.
    pub(crate) emptied: bool,
}

/// Capability shared by the content stored at each level of a region.
pub(crate) trait Content: Clone + PartialEq + Default {
    /// Union `other` into `self`.
    fn combine(&mut self, other: &Self);

    /// Remove `other` from `self`, optionally returning the removed part.
    fn carve(&mut self, other: &Self, keep_overlap: bool) -> Carved<Self>;
}

/// A run has no content of its own: it is simply covered.
impl Content for () {
    fn combine(&mut self, _other: &Self) {}

    fn carve(&mut self, _other: &Self, keep_overlap: bool) -> Carved<Self> {
        Carved {
            overlap: keep_overlap.then_some(()),
            emptied: true,
        }
    }
}

impl<T: Ord + Copy, C: Content> Content for RangeMap<T, C> {
    fn combine(&mut self, other: &Self) {
        combine(self, other);
    }

    fn carve(&mut self, other: &Self, keep_overlap: bool) -> Carved<Self> {
        let overlap = if keep_overlap {
            let mut part = Self::new();
            subtract(self, other, Some(&mut part));
            (!part.is_empty()).then_some(part)
        } else {
            subtract(self, other, None);
            None
        };
        Carved {
            overlap,
            emptied: self.is_empty(),
        }
    }
}

/// Union every span of `operand` into `map`.
pub(crate) fn combine<T: Ord + Copy, C: Content>(map: &mut RangeMap<T, C>, operand: &RangeMap<T, C>) {
    for (start, stop, content) in operand {
        let mut end = stop;
        while start < end {
            let Some(p) = overlapping(map, start, end) else {
                let n = map.insert(start, end, content.clone());
                coalesce(map, n);
                break;
            };
            let (pk, pe) = map.span(p);
            if pe > end {
                split_tail(map, p, end);
            } else if pe < end {
                // Fill the uncovered gap to the right of `p`, then re-probe.
                let gap = map.insert(pe, end, content.clone());
                coalesce(map, gap);
                end = pe;
                continue;
            }
            let key = if pk < start {
                split_head(map, p, start);
                start
            } else {
                pk
            };
            map.content_mut(p).combine(content);
            coalesce(map, p);
            end = key;
        }
    }
}

/// Remove every span of `operand` from `map`.
///
/// When `overlap` is given, the removed parts are merged into it. The caller
/// guarantees `overlap` holds nothing inside the spans being carved.
pub(crate) fn subtract<T: Ord + Copy, C: Content>(
    map: &mut RangeMap<T, C>,
    operand: &RangeMap<T, C>,
    mut overlap: Option<&mut RangeMap<T, C>>,
) {
    for (start, stop, content) in operand {
        let mut end = stop;
        while start < end {
            let Some(p) = overlapping(map, start, end) else {
                break;
            };
            let (pk, pe) = map.span(p);
            if pe > end {
                split_tail(map, p, end);
            } else {
                end = pe;
            }
            let key = if pk < start {
                split_head(map, p, start);
                start
            } else {
                pk
            };
            let carved = map.content_mut(p).carve(content, overlap.is_some());
            if let Some(out) = overlap.as_deref_mut()
                && let Some(part) = carved.overlap
            {
                let n = out.insert(key, end, part);
                coalesce(out, n);
            }
            if carved.emptied {
                map.remove(p);
            } else {
                coalesce(map, p);
            }
            end = key;
        }
    }
}

/// Merge `idx` with touching neighbors whose content is identical.
///
/// Returns the surviving node, which is always `idx`.
pub(crate) fn coalesce<T: Ord + Copy, C: Content>(map: &mut RangeMap<T, C>, idx: NodeIdx) -> NodeIdx {
    while let Some(prev) = map.prev(idx)
        && map.end(prev) == map.key(idx)
        && map.content(prev) == map.content(idx)
    {
        let key = map.key(prev);
        map.remove(prev);
        map.set_key(idx, key);
    }
    while let Some(next) = map.next(idx)
        && map.key(next) == map.end(idx)
        && map.content(next) == map.content(idx)
    {
        let end = map.end(next);
        map.remove(next);
        map.set_end(idx, end);
    }
    idx
}

/// The last node starting before `end`, if it reaches past `start`.
fn overlapping<T: Ord + Copy, C>(map: &RangeMap<T, C>, start: T, end: T) -> Option<NodeIdx> {
    map.find_smaller(end).filter(|&p| map.end(p) > start)
}

/// Cut `[at, end)` off `idx` into a new node with a copy of its content.
fn split_tail<T: Ord + Copy, C: Clone>(map: &mut RangeMap<T, C>, idx: NodeIdx, at: T) {
    let end = map.end(idx);
    let content = map.content(idx).clone();
    map.set_end(idx, at);
    map.insert(at, end, content);
}

/// Cut `[key, at)` off `idx` into a new node with a copy of its content.
fn split_head<T: Ord + Copy, C: Clone>(map: &mut RangeMap<T, C>, idx: NodeIdx, at: T) {
    let key = map.key(idx);
    let content = map.content(idx).clone();
    map.set_key(idx, at);
    map.insert(key, at, content);
}
