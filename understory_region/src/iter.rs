// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-major iteration over the rectangles of a region.

use core::fmt::Debug;

use crate::map::{RangeMap, Spans};
use crate::region::Runs;
use crate::types::{Aabb2D, Scalar};

/// Lazy iterator over the rectangles of a [`Region`](crate::Region).
///
/// Rectangles come out in row-major order: by band from top to bottom, then
/// by run from left to right. They are disjoint and cover the region exactly.
/// The borrow of the region keeps it from being mutated mid-iteration; call
/// [`Region::rects`](crate::Region::rects) again to restart.
pub struct Rects<'a, T: Scalar> {
    bands: Spans<'a, T, Runs<T>>,
    band: Option<(T, T, Spans<'a, T, ()>)>,
}

impl<'a, T: Scalar> Rects<'a, T> {
    pub(crate) fn new(bands: &'a RangeMap<T, Runs<T>>) -> Self {
        Self {
            bands: bands.iter(),
            band: None,
        }
    }
}

impl<T: Scalar> Iterator for Rects<'_, T> {
    type Item = Aabb2D<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((top, bottom, runs)) = &mut self.band
                && let Some((left, right, _)) = runs.next()
            {
                return Some(Aabb2D::new(left, *top, right, *bottom));
            }
            let (top, bottom, runs) = self.bands.next()?;
            self.band = Some((top, bottom, runs.iter()));
        }
    }
}

impl<T: Scalar> core::iter::FusedIterator for Rects<'_, T> {}

impl<T: Scalar> Debug for Rects<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rects")
            .field("band", &self.band.as_ref().map(|(top, bottom, _)| (top, bottom)))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Aabb2D, Region};
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn empty_region_yields_nothing() {
        let region = Region::<i32>::new();
        assert_eq!(region.rects().count(), 0);
    }

    #[test]
    fn row_major_order() {
        let mut region = Region::<i32>::new();
        region.add_rect(Aabb2D::new(20, 0, 30, 10));
        region.add_rect(Aabb2D::new(0, 0, 10, 10));
        region.add_rect(Aabb2D::new(0, 20, 5, 25));
        let got: Vec<_> = region.rects().collect();
        assert_eq!(
            got,
            vec![
                Aabb2D::new(0, 0, 10, 10),
                Aabb2D::new(20, 0, 30, 10),
                Aabb2D::new(0, 20, 5, 25),
            ]
        );
    }

    #[test]
    fn restart_by_calling_rects_again() {
        let region = Region::from_rect(Aabb2D::new(0_i32, 0, 3, 3));
        let mut it = region.rects();
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
        assert_eq!(region.rects().count(), 1);
        assert_eq!((&region).into_iter().count(), 1);
    }
}
