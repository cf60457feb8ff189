// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extents and the scalar abstraction used by the tree.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned rectangle `[min_x, min_y, max_x, max_y]`.
///
/// Edges are inclusive: two extents that only touch still intersect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
}

impl<T> Extent<T> {
    /// Create an extent from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy> Extent<T> {
    /// Degenerate extent covering a single point.
    pub const fn from_point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }

    /// The extent as `[min_x, min_y, max_x, max_y]`.
    pub const fn to_array(&self) -> [T; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl<T: Copy> From<[T; 4]> for Extent<T> {
    fn from([min_x, min_y, max_x, max_y]: [T; 4]) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }
}

impl<T: Copy + PartialOrd> Extent<T> {
    /// False if `min > max` on either axis, or if a pair is not comparable
    /// (a NaN coordinate).
    pub fn is_valid(&self) -> bool {
        le(self.min_x, self.max_x) && le(self.min_y, self.max_y)
    }

    /// Whether the two extents share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// Whether `other` lies entirely inside this extent.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// Whether the extent contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Smallest extent covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// Grow the extent to cover the point.
    pub fn extend_point(&mut self, x: T, y: T) {
        self.min_x = min_t(self.min_x, x);
        self.min_y = min_t(self.min_y, y);
        self.max_x = max_t(self.max_x, x);
        self.max_y = max_t(self.max_y, y);
    }
}

impl<T: Scalar> Extent<T> {
    /// Create an extent from origin and size.
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(x, y, T::add(x, w), T::add(y, h))
    }

    /// Center point, used to order entries during bulk loading.
    pub fn center(&self) -> (T, T) {
        (T::mid(self.min_x, self.max_x), T::mid(self.min_y, self.max_y))
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Extent<f64> {
    fn from(rect: kurbo::Rect) -> Self {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(feature = "kurbo")]
impl Extent<f64> {
    /// The extent as a Kurbo rectangle.
    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Numeric scalar abstraction for extents stored in the tree.
///
/// Areas are accumulated in a widened type (f32→f64, i64→i128) so that the
/// enlargement comparisons driving subtree choice and splits stay exact enough.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b.
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        f64::from(v)
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        i128::from(v)
    }
}

/// Area of an extent in the scalar's widened accumulator type.
#[inline]
pub fn area<T: Scalar>(a: &Extent<T>) -> T::Acc {
    let w = T::max_zero(T::sub(a.max_x, a.min_x));
    let h = T::max_zero(T::sub(a.max_y, a.min_y));
    T::widen(w) * T::widen(h)
}

/// Growth in area needed for `a` to also cover `b`.
#[inline]
pub fn enlargement<T: Scalar>(a: &Extent<T>, b: &Extent<T>) -> T::Acc {
    area(&a.union(b)) - area(a)
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

/// Total order over partially ordered values; incomparable pairs are equal.
pub(crate) fn cmp_t<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}
