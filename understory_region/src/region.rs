// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Region`] type: a set of pixels described by merged rectangles.

use core::fmt::Debug;

use crate::iter::Rects;
use crate::map::RangeMap;
use crate::sweep;
use crate::types::{Aabb2D, Scalar, area};

/// The X-runs of one band.
pub(crate) type Runs<T> = RangeMap<T, ()>;

/// A 2D region built from axis-aligned rectangles.
///
/// The region is stored as maximal horizontal bands (`[top, bottom)` on the Y
/// axis), each holding the maximal covered runs (`[left, right)` on the X
/// axis) valid throughout the band. Touching bands never have identical runs
/// and touching runs never occur within a band: every mutating operation
/// leaves the region in this unique minimal form, which is what makes
/// equality a cheap structural comparison.
#[derive(Clone)]
pub struct Region<T: Scalar> {
    pub(crate) bands: RangeMap<T, Runs<T>>,
}

impl<T: Scalar> Default for Region<T> {
    fn default() -> Self {
        Self {
            bands: RangeMap::new(),
        }
    }
}

impl<T: Scalar> Region<T> {
    /// Create an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region covering a single rectangle.
    ///
    /// An empty rectangle yields an empty region.
    pub fn from_rect(rect: Aabb2D<T>) -> Self {
        let mut region = Self::new();
        region.add_rect(rect);
        region
    }

    /// True if the region covers nothing.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Remove everything from the region.
    pub fn clear(&mut self) {
        self.bands.clear();
    }

    /// Exchange the contents of two regions.
    pub fn swap(&mut self, other: &mut Self) {
        self.bands.swap(&mut other.bands);
    }

    /// Replace this region's content with a deep copy of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Number of stored horizontal bands.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Add a rectangle to the region.
    ///
    /// Rectangles with zero or negative width or height are ignored.
    pub fn add_rect(&mut self, rect: Aabb2D<T>) {
        if rect.is_empty() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(bands = self.bands.len(), ?rect, "region add_rect");
        if self.is_empty() {
            let mut runs = Runs::new();
            runs.insert(rect.min_x, rect.max_x, ());
            self.bands.insert(rect.min_y, rect.max_y, runs);
            return;
        }
        if self.contains_rect(rect) {
            return;
        }
        let mut single = Runs::new();
        single.insert(rect.min_x, rect.max_x, ());
        let mut operand = RangeMap::new();
        operand.insert(rect.min_y, rect.max_y, single);
        sweep::combine(&mut self.bands, &operand);
    }

    /// Union `other` into this region.
    pub fn combine(&mut self, other: &Self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            bands = self.bands.len(),
            operand_bands = other.bands.len(),
            "region combine"
        );
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.copy_from(other);
            return;
        }
        sweep::combine(&mut self.bands, &other.bands);
    }

    /// Remove `other` from this region.
    pub fn subtract(&mut self, other: &Self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            bands = self.bands.len(),
            operand_bands = other.bands.len(),
            "region subtract"
        );
        if self.is_empty() || other.is_empty() {
            return;
        }
        sweep::subtract(&mut self.bands, &other.bands, None);
    }

    /// Keep only the parts of this region that are also in `other`.
    pub fn intersect(&mut self, other: &Self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            bands = self.bands.len(),
            operand_bands = other.bands.len(),
            "region intersect"
        );
        if other.is_empty() {
            self.clear();
            return;
        }
        // Carve `other` out of the old content; what gets carved is the answer.
        let mut rest = core::mem::take(&mut self.bands);
        sweep::subtract(&mut rest, &other.bands, Some(&mut self.bands));
    }

    /// Remove `other` from this region and store the removed part in `overlap`.
    ///
    /// `overlap` is cleared first, so afterwards it equals the intersection of
    /// this region (before the call) with `other`.
    pub fn subtract_with_overlap(&mut self, other: &Self, overlap: &mut Self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            bands = self.bands.len(),
            operand_bands = other.bands.len(),
            "region subtract with overlap"
        );
        overlap.clear();
        if self.is_empty() || other.is_empty() {
            return;
        }
        sweep::subtract(&mut self.bands, &other.bands, Some(&mut overlap.bands));
    }

    /// Translate the region by `(dx, dy)`.
    ///
    /// Coordinates are expected to stay within range; overflow is not handled.
    pub fn offset(&mut self, dx: T, dy: T) {
        #[cfg(feature = "tracing")]
        tracing::trace!(bands = self.bands.len(), ?dx, ?dy, "region offset");
        let zero = T::zero();
        if dx == zero && dy == zero {
            return;
        }
        self.bands.for_each_mut(|top, bottom, runs| {
            if dy != zero {
                *top = T::add(*top, dy);
                *bottom = T::add(*bottom, dy);
            }
            if dx != zero {
                runs.for_each_mut(|left, right, _| {
                    *left = T::add(*left, dx);
                    *right = T::add(*right, dx);
                });
            }
        });
    }

    /// The bounding box of the region, or `None` if it is empty.
    pub fn bounds(&self) -> Option<Aabb2D<T>> {
        let first = self.bands.first()?;
        let last = self.bands.last()?;
        let mut min_x = None::<T>;
        let mut max_x = None::<T>;
        for (_, _, runs) in &self.bands {
            if let (Some(l), Some(r)) = (runs.first(), runs.last()) {
                let (l, r) = (runs.key(l), runs.end(r));
                min_x = Some(min_x.map_or(l, |m| m.min(l)));
                max_x = Some(max_x.map_or(r, |m| m.max(r)));
            }
        }
        Some(Aabb2D::new(
            min_x?,
            self.bands.key(first),
            max_x?,
            self.bands.end(last),
        ))
    }

    /// Total covered area, in the scalar's widened accumulator.
    pub fn area(&self) -> T::Acc {
        self.rects().fold(T::Acc::default(), |acc, r| acc + area(&r))
    }

    /// Whether the point lies inside the region.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        let Some(band) = self.bands.find_exact_smaller(y) else {
            return false;
        };
        if self.bands.end(band) <= y {
            return false;
        }
        let runs = self.bands.content(band);
        runs.find_exact_smaller(x).is_some_and(|run| runs.end(run) > x)
    }

    /// Whether every point of `rect` lies inside the region.
    ///
    /// Empty rectangles are never inside.
    pub fn contains_rect(&self, rect: Aabb2D<T>) -> bool {
        if rect.is_empty() {
            return false;
        }
        let Some(mut band) = self.bands.find_exact_smaller(rect.min_y) else {
            return false;
        };
        loop {
            let runs = self.bands.content(band);
            let covered = runs
                .find_exact_smaller(rect.min_x)
                .is_some_and(|run| runs.end(run) >= rect.max_x);
            if !covered {
                return false;
            }
            // Bands must follow each other without a gap down to `rect.max_y`.
            let end = self.bands.end(band);
            if end >= rect.max_y {
                return true;
            }
            match self.bands.next(band) {
                Some(next) if self.bands.key(next) == end => band = next,
                _ => return false,
            }
        }
    }

    /// Whether any point of `rect` lies inside the region.
    ///
    /// Empty rectangles never intersect.
    pub fn intersects_rect(&self, rect: Aabb2D<T>) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut cur = self.bands.find_smaller(rect.max_y);
        while let Some(band) = cur {
            if self.bands.end(band) <= rect.min_y {
                break;
            }
            let runs = self.bands.content(band);
            if runs
                .find_smaller(rect.max_x)
                .is_some_and(|run| runs.end(run) > rect.min_x)
            {
                return true;
            }
            cur = self.bands.prev(band);
        }
        false
    }

    /// Iterate the decomposed rectangles in row-major (Y then X) order.
    ///
    /// The rectangles are disjoint and exactly cover the region.
    pub fn rects(&self) -> Rects<'_, T> {
        Rects::new(&self.bands)
    }

    /// Panics if the region is not in canonical form.
    ///
    /// Checks tree structure, span ordering, `end > key` for every span, that
    /// no band is empty, that touching bands differ, and that no two runs in
    /// a band touch or overlap. Meant for tests; the algebra never calls it.
    pub fn assert_valid(&self) {
        self.bands.check_structure();
        let mut prev: Option<(T, &Runs<T>)> = None;
        for (top, bottom, runs) in &self.bands {
            assert!(bottom > top, "band {top:?}..{bottom:?} is empty");
            assert!(!runs.is_empty(), "band {top:?}..{bottom:?} has no runs");
            if let Some((prev_bottom, prev_runs)) = prev {
                assert!(prev_bottom <= top, "band at {top:?} overlaps its predecessor");
                assert!(
                    prev_bottom < top || prev_runs != runs,
                    "band at {top:?} should have been merged with its predecessor"
                );
            }
            runs.check_structure();
            let mut prev_right: Option<T> = None;
            for (left, right, _) in runs {
                assert!(right > left, "run {left:?}..{right:?} is empty");
                if let Some(pr) = prev_right {
                    assert!(pr < left, "run at {left:?} touches or overlaps its predecessor");
                }
                prev_right = Some(right);
            }
            prev = Some((bottom, runs));
        }
    }
}

impl<T: Scalar> PartialEq for Region<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bands == other.bands
    }
}

impl<T: Scalar> Eq for Region<T> {}

impl<T: Scalar> Debug for Region<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.rects()).finish()
    }
}

impl<T: Scalar> From<Aabb2D<T>> for Region<T> {
    fn from(rect: Aabb2D<T>) -> Self {
        Self::from_rect(rect)
    }
}

impl<T: Scalar> Extend<Aabb2D<T>> for Region<T> {
    fn extend<I: IntoIterator<Item = Aabb2D<T>>>(&mut self, iter: I) {
        for rect in iter {
            self.add_rect(rect);
        }
    }
}

impl<T: Scalar> FromIterator<Aabb2D<T>> for Region<T> {
    fn from_iter<I: IntoIterator<Item = Aabb2D<T>>>(iter: I) -> Self {
        let mut region = Self::new();
        region.extend(iter);
        region
    }
}

impl<'a, T: Scalar> IntoIterator for &'a Region<T> {
    type Item = Aabb2D<T>;
    type IntoIter = Rects<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects()
    }
}
