pub mod numeric;

pub use numeric::{
    epsilon, epsilon_equal, epsilon_not_equal, epsilon_sqr, max, min, min_positive, Bounded,
    Tolerance,
};

/// Scalar types accepted by the generic geometry types.
pub trait Real: nalgebra::RealField + Tolerance {}

impl<T: nalgebra::RealField + Tolerance> Real for T {}

/// Normalizes `v`, returning the unit vector and the original length.
///
/// The vector is divided by its largest absolute component first, so the norm
/// does not overflow for coordinates near the top of the scalar range. Returns
/// `None` for the zero vector and when the largest component is not finite.
pub(crate) fn normalize_scaled<T: Real, const D: usize>(
    v: &nalgebra::SVector<T, D>,
) -> Option<(nalgebra::SVector<T, D>, T)> {
    let scale = v.amax();
    if scale <= nalgebra::zero::<T>() || !scale.is_finite() {
        return None;
    }
    let scaled = v / scale;
    let n = scaled.norm();
    Some((scaled / n, n * scale))
}

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Single-precision 2D point type.
pub type Point2f = nalgebra::Point2<f32>;

/// Single-precision 3D point type.
pub type Point3f = nalgebra::Point3<f32>;

/// Single-precision 2D vector type.
pub type Vector2f = nalgebra::Vector2<f32>;

/// Single-precision 3D vector type.
pub type Vector3f = nalgebra::Vector3<f32>;

/// Global geometric tolerance for floating-point comparisons in operations.
pub const TOLERANCE: f64 = 1e-10;

/// Squared endpoint distance below which a segment counts as degenerate.
pub const DEGENERATE_LENGTH_SQR: f64 = 1e-15;
