// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::fmt::Debug;

/// Axis-aligned rectangle in 2D, half-open on both axes.
///
/// A rectangle covers `[min_x, max_x) × [min_y, max_y)`. A rectangle whose
/// width or height is zero or negative covers nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Aabb2D<T> {
    /// Minimum x (left, inclusive)
    pub min_x: T,
    /// Minimum y (top, inclusive)
    pub min_y: T,
    /// Maximum x (right, exclusive)
    pub max_x: T,
    /// Maximum y (bottom, exclusive)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new rectangle from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Create a rectangle from origin and size.
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(x, y, T::add(x, w), T::add(y, h))
    }

    /// Width of the rectangle (may be negative for inverted input).
    ///
    /// Saturates when the true width does not fit in `T`; use [`area`] for an
    /// exact size.
    pub fn width(&self) -> T {
        T::sub(self.max_x, self.min_x)
    }

    /// Height of the rectangle (may be negative for inverted input).
    pub fn height(&self) -> T {
        T::sub(self.max_y, self.min_y)
    }

    /// True if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Whether the half-open rectangle contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }

    /// The intersection of two rectangles. May be empty.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// The smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Translate the rectangle by `(dx, dy)`.
    pub fn translate(&self, dx: T, dy: T) -> Self {
        Self {
            min_x: T::add(self.min_x, dx),
            min_y: T::add(self.min_y, dy),
            max_x: T::add(self.max_x, dx),
            max_y: T::add(self.max_y, dy),
        }
    }
}

/// Integer coordinate abstraction for regions.
///
/// Regions need a total order (so spans can be keyed in an ordered map) and
/// exact arithmetic (so adjacent spans meet exactly), which rules out floats.
/// The associated accumulator (e.g., i32→i64, i64→i128) holds the exact
/// width and height of any rectangle, and any area up to the square of
/// `T::MAX`.
///
/// `sub` saturates. `add` is not overflow-checked beyond what the platform
/// does for the primitive type, so translated coordinates are expected to
/// stay inside the range.
pub trait Scalar: Copy + Ord + Debug {
    /// Widened accumulator type suitable for area computations.
    type Acc: Copy
        + Ord
        + Default
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b, saturating at the type's bounds.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

impl Scalar for i32 {
    type Acc = i64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        Self::Acc::from(v)
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        Self::Acc::from(v)
    }
}

/// Compute the area of a rectangle using the scalar's widened accumulator type.
///
/// Empty or inverted rectangles have zero area. Edges are widened before
/// subtracting, so the result is exact for any coordinates.
#[inline]
pub fn area<T: Scalar>(a: &Aabb2D<T>) -> T::Acc {
    if a.is_empty() {
        return T::Acc::default();
    }
    let w = T::widen(a.max_x) - T::widen(a.min_x);
    let h = T::widen(a.max_y) - T::widen(a.min_y);
    w * h
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;
