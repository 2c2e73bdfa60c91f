// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region basics.
//!
//! Build a region from overlapping rectangles, run the set operations, and
//! print the resulting decompositions.
//!
//! Run:
//! - `cargo run -p understory_demos --example region_basics`

use understory_region::{Aabb2D, Region};

fn print(label: &str, region: &Region<i64>) {
    println!("{label}: bounds={:?} area={}", region.bounds(), region.area());
    for r in region {
        println!("  [{}, {}) x [{}, {})", r.min_x, r.max_x, r.min_y, r.max_y);
    }
}

fn main() {
    // Two overlapping squares decompose into three bands.
    let mut a = Region::new();
    a.add_rect(Aabb2D::new(0, 0, 10, 10));
    a.add_rect(Aabb2D::new(5, 5, 15, 15));
    print("a", &a);

    let b = Region::from_rect(Aabb2D::new(8, 0, 20, 8));
    print("b", &b);

    let mut union = a.clone();
    union.combine(&b);
    print("a | b", &union);

    let mut inter = a.clone();
    inter.intersect(&b);
    print("a & b", &inter);

    // Difference and intersection in one sweep.
    let mut diff = a.clone();
    let mut overlap = Region::new();
    diff.subtract_with_overlap(&b, &mut overlap);
    print("a - b", &diff);
    assert_eq!(overlap, inter, "overlap output should equal the intersection");

    // Putting the pieces back together gives the original region.
    diff.combine(&overlap);
    assert_eq!(diff, a);

    // Moving a region and moving it back is lossless.
    let mut moved = a.clone();
    moved.offset(100, -50);
    print("a moved", &moved);
    moved.offset(-100, 50);
    assert_eq!(moved, a);
}
