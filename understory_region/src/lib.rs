// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_region --heading-base-level=0

//! Understory Region: a set of integer pixels described by merged rectangles.
//!
//! Understory Region is a reusable building block for clip regions and dirty-rectangle tracking.
//!
//! - Add rectangles, and combine, subtract, or intersect whole regions in place.
//! - Query by point or rectangle (fully inside or partly inside), and compute bounds.
//! - Iterate the region as a sequence of disjoint rectangles in row-major order.
//!
//! A [`Region`] is stored as maximal horizontal bands, each holding the maximal covered runs
//! valid throughout the band. Every operation leaves the region in this unique minimal form,
//! so two regions covering the same pixels are always structurally identical and compare
//! equal cheaply.
//!
//! It is generic over an integer scalar `T` ([`Scalar`] is implemented for `i32` and `i64`) and
//! does not depend on any geometry crate. The `kurbo` feature adds snapping from Kurbo float
//! rectangles for renderers that track damage in floats.
//!
//! # Example
//!
//! ```rust
//! use understory_region::{Aabb2D, Region};
//!
//! // Two overlapping squares.
//! let mut region = Region::<i64>::new();
//! region.add_rect(Aabb2D::new(0, 0, 10, 10));
//! region.add_rect(Aabb2D::new(5, 5, 15, 15));
//!
//! assert_eq!(region.bounds(), Some(Aabb2D::new(0, 0, 15, 15)));
//! assert!(region.contains_point(12, 12));
//! assert!(!region.contains_point(12, 2));
//! assert_eq!(region.area(), 175);
//!
//! // Decomposed into three disjoint bands.
//! let rects: Vec<_> = region.rects().collect();
//! assert_eq!(rects.len(), 3);
//! ```
//!
//! Set algebra works in place:
//!
//! ```rust
//! use understory_region::{Aabb2D, Region};
//!
//! let mut screen = Region::from_rect(Aabb2D::new(0, 0, 100, 100));
//! let window = Region::from_rect(Aabb2D::new(20, 20, 60, 60));
//!
//! // Punch the window out of the screen, keeping what was removed.
//! let mut covered = Region::new();
//! screen.subtract_with_overlap(&window, &mut covered);
//! assert_eq!(covered, window);
//! assert!(!screen.contains_point(30, 30));
//!
//! // Putting it back restores a single rectangle.
//! screen.combine(&covered);
//! assert_eq!(screen.rects().count(), 1);
//! ```
//!
//! ## Ordered map
//!
//! Both levels of a region are stored in a [`RangeMap`]: an arena AVL tree of half-open spans
//! addressed by stable [`NodeIdx`] handles. It is exposed for callers that need a plain 1D span
//! map with neighbor searches.
//!
//! ## Invariants and debugging
//!
//! - Rectangles are half-open: `[min_x, max_x) × [min_y, max_y)`.
//! - Rectangles with zero or negative width or height are ignored by [`Region::add_rect`].
//! - Coordinate arithmetic in [`Region::offset`] is not overflow-checked.
//! - [`Region::assert_valid`] checks the canonical form and the tree structure; tests call it
//!   after every step. The algebra itself never does.
//! - The `tracing` feature emits a trace event for each mutating operation.

#![no_std]

extern crate alloc;

pub mod iter;
#[cfg(feature = "kurbo")]
pub mod kurbo_interop;
pub mod map;
pub mod region;
mod sweep;
pub mod types;

pub use iter::Rects;
pub use map::{NodeIdx, RangeMap, Spans};
pub use region::Region;
pub use types::{Aabb2D, Scalar, ScalarAcc};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_combine_subtract_and_query() {
        let mut region: Region<i64> = Region::new();
        region.add_rect(Aabb2D::new(0, 0, 10, 10));
        region.add_rect(Aabb2D::new(5, 5, 15, 15));
        region.assert_valid();
        assert!(region.contains_point(12, 12));

        let other = Region::from_rect(Aabb2D::new(0, 0, 15, 15));
        let mut hole = other.clone();
        hole.subtract(&region);
        hole.assert_valid();
        assert_eq!(hole.area(), 225 - 175);

        hole.combine(&region);
        assert_eq!(hole, other);
    }

    #[test]
    fn i32_regions_work_too() {
        let mut region: Region<i32> = Region::from_rect(Aabb2D::new(-5, -5, 5, 5));
        region.intersect(&Region::from_rect(Aabb2D::new(0, 0, 10, 10)));
        assert_eq!(region.bounds(), Some(Aabb2D::new(0, 0, 5, 5)));
        assert_eq!(region.area(), 25_i64);
    }
}
