// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region damage.
//!
//! Accumulate a frame's float damage rectangles into a pixel region, clip it
//! to the viewport, and drop the parts hidden behind opaque overlays. What is
//! left is the minimal set of rectangles to repaint.
//!
//! Run:
//! - `cargo run -p understory_demos --example region_damage`

use kurbo::Rect;
use understory_region::Region;
use understory_region::kurbo_interop::aabb_from_kurbo;

fn main() {
    let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);

    // Damage reported by widgets this frame, in float coordinates.
    let damage = [
        Rect::new(10.2, 10.7, 120.0, 40.0),
        Rect::new(100.0, 30.0, 260.5, 80.0),
        Rect::new(750.0, 550.0, 900.0, 700.0),
        Rect::new(300.0, 300.0, 420.0, 380.0),
    ];

    let mut dirty = Region::<i64>::new();
    for r in damage {
        dirty.add_kurbo_rect(r);
    }
    println!("raw damage bounds: {:?}", dirty.kurbo_bounds());

    let mut clip = Region::<i64>::new();
    clip.add_kurbo_rect(viewport);
    dirty.intersect(&clip);

    // An opaque dialog covers part of the screen; nothing under it repaints.
    let mut opaque = Region::<i64>::new();
    opaque.add_kurbo_rect(Rect::new(280.0, 280.0, 500.0, 400.0));
    let mut hidden = Region::new();
    dirty.subtract_with_overlap(&opaque, &mut hidden);

    println!("hidden area skipped: {}", hidden.area());
    println!("repaint {} rects:", dirty.rects().count());
    for r in dirty.kurbo_rects() {
        println!("  {r:?}");
    }
    let covered = aabb_from_kurbo(Rect::new(300.0, 300.0, 420.0, 380.0));
    assert!(
        !dirty.intersects_rect(covered),
        "damage under the opaque dialog should be dropped"
    );
}
