// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interop with [Kurbo](https://docs.rs/kurbo) float rectangles.
//!
//! Renderers usually track damage in float coordinates. Regions need exact
//! integer edges, so float rectangles are snapped outward to the enclosing
//! pixel grid: the integer rectangle always covers the float one.

use kurbo::Rect;

use crate::region::Region;
use crate::types::Aabb2D;

/// Snap a Kurbo rectangle outward to integer coordinates.
///
/// The rectangle is normalized first, so inverted input is accepted.
/// Coordinates outside the `i64` range saturate; NaNs map to zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Float-to-int `as` casts saturate, which is the intended clamping."
)]
pub fn aabb_from_kurbo(rect: Rect) -> Aabb2D<i64> {
    let r = rect.abs().expand();
    Aabb2D::new(r.x0 as i64, r.y0 as i64, r.x1 as i64, r.y1 as i64)
}

/// Convert an integer rectangle to a Kurbo rectangle.
pub fn aabb_to_kurbo(aabb: Aabb2D<i64>) -> Rect {
    Rect::new(
        aabb.min_x as f64,
        aabb.min_y as f64,
        aabb.max_x as f64,
        aabb.max_y as f64,
    )
}

impl Region<i64> {
    /// Add a float rectangle, snapped outward to the pixel grid.
    pub fn add_kurbo_rect(&mut self, rect: Rect) {
        self.add_rect(aabb_from_kurbo(rect));
    }

    /// Iterate the region's rectangles as Kurbo rectangles.
    pub fn kurbo_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.rects().map(aabb_to_kurbo)
    }

    /// The bounding box of the region as a Kurbo rectangle.
    pub fn kurbo_bounds(&self) -> Option<Rect> {
        self.bounds().map(aabb_to_kurbo)
    }
}
