use std::ops::Sub;

/// Scalar types with a finite representable range.
pub trait Bounded: Copy {
    /// Most negative finite value.
    const MIN: Self;
    /// Largest finite value.
    const MAX: Self;
}

/// Floating-point scalars carrying library tolerances.
///
/// The tolerances are coarser than machine epsilon: they describe the
/// numerical noise the geometric predicates accept, not the precision of the
/// IEEE type.
pub trait Tolerance: Bounded {
    /// Smallest difference treated as meaningful.
    const EPSILON: Self;
    /// `EPSILON * EPSILON`, for comparing squared distances.
    const EPSILON_SQR: Self;
    /// Smallest positive normal value.
    const MIN_POSITIVE: Self;
}

impl Bounded for i32 {
    const MIN: Self = i32::MIN;
    const MAX: Self = i32::MAX;
}

impl Bounded for f32 {
    const MIN: Self = f32::MIN;
    const MAX: Self = f32::MAX;
}

impl Bounded for f64 {
    const MIN: Self = f64::MIN;
    const MAX: Self = f64::MAX;
}

impl Tolerance for f32 {
    const EPSILON: Self = 1.0e-6;
    const EPSILON_SQR: Self = 1.0e-12;
    const MIN_POSITIVE: Self = f32::MIN_POSITIVE;
}

impl Tolerance for f64 {
    const EPSILON: Self = 1.0e-12;
    const EPSILON_SQR: Self = 1.0e-24;
    const MIN_POSITIVE: Self = f64::MIN_POSITIVE;
}

/// Returns the most negative finite value of `T`.
///
/// For floats this is `T::MIN` (e.g. `-f32::MAX`), not the smallest positive
/// normal value that C's `FLT_MIN`/`DBL_MIN` denote; use [`min_positive`] for
/// that.
#[must_use]
#[inline]
pub fn min<T: Bounded>() -> T {
    T::MIN
}

/// Returns the largest finite value of `T`.
#[must_use]
#[inline]
pub fn max<T: Bounded>() -> T {
    T::MAX
}

/// Returns the smallest positive normal value of `T`.
#[must_use]
#[inline]
pub fn min_positive<T: Tolerance>() -> T {
    T::MIN_POSITIVE
}

/// Returns the library tolerance for `T`.
#[must_use]
#[inline]
pub fn epsilon<T: Tolerance>() -> T {
    T::EPSILON
}

/// Returns the squared library tolerance for `T`.
#[must_use]
#[inline]
pub fn epsilon_sqr<T: Tolerance>() -> T {
    T::EPSILON_SQR
}

/// Returns `true` if `|x - y| < eps`.
///
/// The comparison is strict, so `epsilon_equal(x, x, 0)` is `false`. Works for
/// integers as well as floats; the difference is always taken larger minus
/// smaller, so it never goes negative.
#[must_use]
#[inline]
pub fn epsilon_equal<T: Copy + PartialOrd + Sub<Output = T>>(x: T, y: T, eps: T) -> bool {
    abs_diff(x, y) < eps
}

/// Returns `true` if `|x - y| >= eps`. Exact complement of [`epsilon_equal`].
#[must_use]
#[inline]
pub fn epsilon_not_equal<T: Copy + PartialOrd + Sub<Output = T>>(x: T, y: T, eps: T) -> bool {
    !epsilon_equal(x, y, eps)
}

#[inline]
fn abs_diff<T: Copy + PartialOrd + Sub<Output = T>>(x: T, y: T) -> T {
    if x >= y {
        x - y
    } else {
        y - x
    }
}
