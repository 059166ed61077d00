use nalgebra::{Point, SVector, Scalar};

use crate::error::{GeometryError, Result};
use crate::math::{normalize_scaled, Real};

/// An infinite line in `D`-dimensional space.
///
/// Stored as a point on the line and a unit direction vector, so the
/// parametric form is `P(t) = point + t * direction` with `t` measured in
/// arc length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericLine<T: Scalar, const D: usize> {
    point: Point<T, D>,
    direction: SVector<T, D>,
}

/// 2D line.
pub type Line2 = GenericLine<f64, 2>;
/// 3D line.
pub type Line3 = GenericLine<f64, 3>;
/// Single-precision 2D line.
pub type Line2f = GenericLine<f32, 2>;
/// Single-precision 3D line.
pub type Line3f = GenericLine<f32, 3>;

impl<T: Real, const D: usize> GenericLine<T, D> {
    /// Creates a line through `point` along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `direction` is shorter than the
    /// scalar tolerance.
    pub fn from_point_and_direction(point: Point<T, D>, direction: SVector<T, D>) -> Result<Self> {
        let direction = unit_direction(direction)?;
        Ok(Self { point, direction })
    }

    /// Creates the line through `p` and `q`, directed from `p` to `q`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the two points coincide.
    pub fn from_two_points(p: Point<T, D>, q: Point<T, D>) -> Result<Self> {
        Self::from_point_and_direction(p, q - p)
    }

    /// Re-seats the line through `point` along `direction`.
    ///
    /// On error the line is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero-length direction.
    pub fn set(&mut self, point: Point<T, D>, direction: SVector<T, D>) -> Result<()> {
        self.direction = unit_direction(direction)?;
        self.point = point;
        Ok(())
    }

    /// Returns the anchor point of the line.
    #[must_use]
    pub fn point(&self) -> &Point<T, D> {
        &self.point
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &SVector<T, D> {
        &self.direction
    }

    /// Orthogonal projection of `p` onto the line.
    #[must_use]
    pub fn projection(&self, p: &Point<T, D>) -> Point<T, D> {
        self.point + self.direction * (p - self.point).dot(&self.direction)
    }

    /// Squared distance from `p` to the line.
    #[must_use]
    pub fn squared_distance(&self, p: &Point<T, D>) -> T {
        (p - self.projection(p)).norm_squared()
    }

    /// Returns `true` if `p` lies within `eps` of the line.
    #[must_use]
    pub fn contains_point(&self, p: &Point<T, D>, eps: T) -> bool {
        self.squared_distance(p) < eps * eps
    }
}

impl<T: Real> GenericLine<T, 3> {
    /// Computes the mutually closest points of two 3D lines.
    ///
    /// Returns `(on_self, on_other)`, or `None` when the lines are parallel.
    #[must_use]
    pub fn feet(&self, other: &Self) -> Option<(Point<T, 3>, Point<T, 3>)> {
        let d1 = self.direction;
        let d2 = other.direction;
        let w = self.point - other.point;

        // Both directions are unit length, so a = c = 1 in the normal equations.
        let b = d1.dot(&d2);
        let d = d1.dot(&w);
        let e = d2.dot(&w);
        let denom = nalgebra::one::<T>() - b * b;
        if denom < T::EPSILON {
            return None;
        }

        let s = (b * e - d) / denom;
        let t = (e - b * d) / denom;
        Some((self.point + d1 * s, other.point + d2 * t))
    }
}

fn unit_direction<T: Real, const D: usize>(direction: SVector<T, D>) -> Result<SVector<T, D>> {
    match normalize_scaled(&direction) {
        Some((unit, len)) if len >= T::EPSILON => Ok(unit),
        _ => Err(GeometryError::ZeroVector.into()),
    }
}
