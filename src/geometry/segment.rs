use nalgebra::{Point, SVector, Scalar};
use tracing::warn;

use super::line::GenericLine;
use crate::error::{GeometryError, Result};
use crate::math::{normalize_scaled, Real, DEGENERATE_LENGTH_SQR};

/// A finite straight-line segment in `D`-dimensional space.
///
/// The segment owns its two endpoints by value. A segment is meant to have
/// distinct endpoints; constructing one from (nearly) coincident points is
/// allowed but logged, and queries that need a direction fall back to
/// documented values in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericSegment<T: Scalar, const D: usize> {
    source: Point<T, D>,
    target: Point<T, D>,
}

/// 2D segment.
pub type Segment2 = GenericSegment<f64, 2>;
/// 3D segment.
pub type Segment3 = GenericSegment<f64, 3>;
/// Single-precision 2D segment.
pub type Segment2f = GenericSegment<f32, 2>;
/// Single-precision 3D segment.
pub type Segment3f = GenericSegment<f32, 3>;

impl<T: Real, const D: usize> GenericSegment<T, D> {
    /// Creates a segment from `source` to `target`.
    ///
    /// Emits a warning event if the endpoints are closer than
    /// [`DEGENERATE_LENGTH_SQR`] (squared); the segment is still built.
    #[must_use]
    pub fn new(source: Point<T, D>, target: Point<T, D>) -> Self {
        let segment = Self { source, target };
        if segment.is_degenerate() {
            warn!(?source, ?target, "degenerate segment constructed from two points");
        }
        segment
    }

    /// Returns the source end point.
    #[must_use]
    pub fn source(&self) -> &Point<T, D> {
        &self.source
    }

    /// Returns the target end point.
    #[must_use]
    pub fn target(&self) -> &Point<T, D> {
        &self.target
    }

    /// Replaces the source end point. No degeneracy check is made.
    pub fn set_source(&mut self, source: Point<T, D>) {
        self.source = source;
    }

    /// Replaces the target end point. No degeneracy check is made.
    pub fn set_target(&mut self, target: Point<T, D>) {
        self.target = target;
    }

    /// Returns the infinite line through both end points, directed source to target.
    ///
    /// Uses the same threshold as [`is_degenerate`](Self::is_degenerate), so a
    /// segment gets a line exactly when construction did not warn about it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the segment is degenerate.
    pub fn supporting_line(&self) -> Result<GenericLine<T, D>> {
        let dir = self.direction().ok_or_else(|| {
            GeometryError::Degenerate(format!(
                "segment from {:?} to {:?} has no supporting line",
                self.source, self.target
            ))
        })?;
        GenericLine::from_point_and_direction(self.source, dir)
    }

    /// Vector from `source()` to `target()`.
    #[must_use]
    pub fn to_vector(&self) -> SVector<T, D> {
        self.target - self.source
    }

    #[must_use]
    pub fn squared_length(&self) -> T {
        self.to_vector().norm_squared()
    }

    #[must_use]
    pub fn length(&self) -> T {
        self.to_vector().norm()
    }

    /// Returns `true` if the squared length is below [`DEGENERATE_LENGTH_SQR`].
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.squared_length() < nalgebra::convert::<f64, T>(DEGENERATE_LENGTH_SQR)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point<T, D> {
        nalgebra::center(&self.source, &self.target)
    }

    /// Unit vector from source to target, `None` when degenerate.
    fn direction(&self) -> Option<SVector<T, D>> {
        if self.is_degenerate() {
            return None;
        }
        normalize_scaled(&self.to_vector()).map(|(unit, _)| unit)
    }

    /// Projects `p` onto the supporting line of this segment.
    ///
    /// This is a line projection: the result is not clamped to the segment
    /// (see [`closest_point`](Self::closest_point) for that). A degenerate
    /// segment has no direction and returns `source()`.
    #[must_use]
    pub fn projection(&self, p: &Point<T, D>) -> Point<T, D> {
        match self.direction() {
            Some(dir) => self.source + dir * (p - self.source).dot(&dir),
            None => self.source,
        }
    }

    /// Returns `true` if the perpendicular foot of `p` on the supporting line
    /// falls strictly between the end points.
    ///
    /// A foot landing exactly on an end point is outside, and so is every
    /// point for a zero-length segment.
    #[must_use]
    pub fn projected_inside(&self, p: &Point<T, D>) -> bool {
        let zero = nalgebra::zero::<T>();
        (p - self.source).dot(&(self.target - self.source)) > zero
            && (p - self.target).dot(&(self.source - self.target)) > zero
    }

    /// Squared distance from `p` to the nearest point of this segment.
    #[must_use]
    pub fn squared_distance(&self, p: &Point<T, D>) -> T {
        if self.projected_inside(p) {
            nalgebra::distance_squared(&self.projection(p), p)
        } else {
            let ds = nalgebra::distance_squared(&self.source, p);
            let dt = nalgebra::distance_squared(&self.target, p);
            ds.min(dt)
        }
    }

    /// Nearest point of this segment to `p`.
    ///
    /// Agrees with [`squared_distance`](Self::squared_distance): the foot on the
    /// supporting line when it lies inside, otherwise the closer end point.
    #[must_use]
    pub fn closest_point(&self, p: &Point<T, D>) -> Point<T, D> {
        if self.projected_inside(p) {
            self.projection(p)
        } else if nalgebra::distance_squared(&self.source, p)
            <= nalgebra::distance_squared(&self.target, p)
        {
            self.source
        } else {
            self.target
        }
    }
}

impl<T: Real, const D: usize> Default for GenericSegment<T, D> {
    /// A zero-length placeholder at the origin. Not logged.
    fn default() -> Self {
        Self {
            source: Point::origin(),
            target: Point::origin(),
        }
    }
}

impl<T: Real, const D: usize> From<(Point<T, D>, Point<T, D>)> for GenericSegment<T, D> {
    fn from((source, target): (Point<T, D>, Point<T, D>)) -> Self {
        Self::new(source, target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::error::GeokitError;
    use crate::math::{Point2, Point2f, Point3, Point3f, Vector2};

    const TOL: f64 = 1e-10;

    /// Counts WARN events seen while installed.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    fn x_axis_segment() -> Segment2 {
        Segment2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
    }

    #[test]
    fn accessors_return_endpoints() {
        let s = Segment3::new(Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 0.0, 4.0));
        assert_eq!(*s.source(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(*s.target(), Point3::new(-1.0, 0.0, 4.0));
    }

    #[test]
    fn projection_above_segment() {
        let s = x_axis_segment();
        let p = Point2::new(5.0, 5.0);
        let foot = s.projection(&p);
        assert_relative_eq!(foot, Point2::new(5.0, 0.0), epsilon = TOL);
        assert!(s.projected_inside(&p));
        assert_relative_eq!(s.squared_distance(&p), 25.0, epsilon = TOL);
    }

    #[test]
    fn point_before_source() {
        let s = x_axis_segment();
        let p = Point2::new(-1.0, 0.0);
        assert!(!s.projected_inside(&p));
        assert_relative_eq!(s.squared_distance(&p), 1.0, epsilon = TOL);
        assert_eq!(s.closest_point(&p), *s.source());
    }

    #[test]
    fn point_beyond_target() {
        let s = x_axis_segment();
        let p = Point2::new(11.0, 0.0);
        assert!(!s.projected_inside(&p));
        assert_relative_eq!(s.squared_distance(&p), 1.0, epsilon = TOL);
        assert_eq!(s.closest_point(&p), *s.target());
    }

    #[test]
    fn projection_is_not_clamped() {
        let s = x_axis_segment();
        let foot = s.projection(&Point2::new(15.0, -2.0));
        assert_relative_eq!(foot, Point2::new(15.0, 0.0), epsilon = TOL);
        assert_relative_eq!(s.closest_point(&Point2::new(15.0, -2.0)), Point2::new(10.0, 0.0));
    }

    #[test]
    fn projection_on_endpoint_is_outside() {
        let s = x_axis_segment();
        assert!(!s.projected_inside(&Point2::new(0.0, 3.0)));
        assert!(!s.projected_inside(&Point2::new(10.0, -3.0)));
        assert_relative_eq!(s.squared_distance(&Point2::new(10.0, -3.0)), 9.0, epsilon = TOL);
    }

    #[test]
    fn to_vector_tracks_setters() {
        let mut s = Segment2::new(Point2::new(1.0, 1.0), Point2::new(4.0, 5.0));
        assert_eq!(s.to_vector(), Vector2::new(3.0, 4.0));
        assert_relative_eq!(s.length(), 5.0, epsilon = TOL);

        s.set_source(Point2::new(-2.0, 0.0));
        assert_eq!(s.to_vector(), Vector2::new(6.0, 5.0));

        s.set_target(Point2::new(-2.0, 7.0));
        assert_eq!(s.to_vector(), *s.target() - *s.source());
        assert_eq!(s.to_vector(), Vector2::new(0.0, 7.0));
    }

    #[test]
    fn supporting_line_contains_endpoints() {
        let s = Segment3::new(Point3::new(0.5, -1.0, 2.0), Point3::new(3.0, 4.0, -2.5));
        let line = s.supporting_line().unwrap();
        assert!(line.contains_point(s.source(), 1e-9));
        assert!(line.contains_point(s.target(), 1e-9));
        assert!(!line.contains_point(&s.midpoint().map(|c| c + 1.0), 1e-9));
    }

    #[test]
    fn degenerate_construction_warns() {
        let p = Point3::new(2.0, 2.0, 2.0);
        let warnings = count_warnings(|| {
            let s = Segment3::new(p, p);
            assert!(s.is_degenerate());
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn regular_construction_does_not_warn() {
        let warnings = count_warnings(|| {
            let _ = x_axis_segment();
            let _ = Segment2::default();
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn setters_skip_degeneracy_check() {
        let warnings = count_warnings(|| {
            let mut s = x_axis_segment();
            s.set_target(*s.source());
            assert!(s.is_degenerate());
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn degenerate_queries_fall_back() {
        let p = Point2::new(1.0, 1.0);
        let s = Segment2::new(p, p);
        assert_eq!(s.projection(&Point2::new(4.0, 5.0)), p);
        assert!(!s.projected_inside(&Point2::new(4.0, 5.0)));
        assert_relative_eq!(s.squared_distance(&Point2::new(4.0, 5.0)), 25.0, epsilon = TOL);
        assert!(matches!(
            s.supporting_line(),
            Err(GeokitError::Geometry(GeometryError::Degenerate(_)))
        ));
    }

    #[test]
    fn near_coincident_endpoints_warn() {
        let warnings = count_warnings(|| {
            let s = Segment3::new(Point3::origin(), Point3::new(1e-8, 0.0, 0.0));
            assert!(s.is_degenerate());
        });
        assert_eq!(warnings, 1);

        let warnings = count_warnings(|| {
            let s = Segment3::new(Point3::origin(), Point3::new(1e-7, 0.0, 0.0));
            assert!(!s.is_degenerate());
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn near_coincident_endpoints_warn_single_precision() {
        let warnings = count_warnings(|| {
            let _ = Segment2f::new(Point2f::origin(), Point2f::new(1e-8, 0.0));
        });
        assert_eq!(warnings, 1);

        let warnings = count_warnings(|| {
            let _ = Segment2f::new(Point2f::origin(), Point2f::new(1e-7, 0.0));
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn supporting_line_follows_degeneracy_threshold() {
        // Shorter than the f32 tolerance, yet above the degeneracy threshold.
        let short = Segment3f::new(Point3f::origin(), Point3f::new(5e-7, 0.0, 0.0));
        assert!(!short.is_degenerate());
        let line = short.supporting_line().unwrap();
        assert_relative_eq!(line.direction().x, 1.0_f32, epsilon = 1e-6);

        let tiny = Segment3::new(Point3::origin(), Point3::new(1e-9, 0.0, 0.0));
        assert!(tiny.is_degenerate());
        assert!(matches!(
            tiny.supporting_line(),
            Err(GeokitError::Geometry(GeometryError::Degenerate(_)))
        ));
        assert_eq!(tiny.projection(&Point3::new(1.0, 1.0, 0.0)), Point3::origin());
    }

    #[test]
    fn foot_inside_but_outside_diameter_circle() {
        // (1, 4) lies outside the circle on the segment as diameter, but its
        // foot (1, 0) is still between the end points.
        let s = x_axis_segment();
        let p = Point2::new(1.0, 4.0);
        assert!(s.projected_inside(&p));
        assert_relative_eq!(s.squared_distance(&p), 16.0, epsilon = TOL);
        assert_relative_eq!(s.closest_point(&p), Point2::new(1.0, 0.0), epsilon = TOL);
    }

    #[test]
    fn huge_coordinates_do_not_overflow() {
        let s = Segment2::new(Point2::new(1e200, 0.0), Point2::new(3e200, 0.0));
        let p = Point2::new(2e200, 1.0);
        assert!(s.projected_inside(&p));
        assert_relative_eq!(s.projection(&p), Point2::new(2e200, 0.0), max_relative = 1e-12);
        assert_relative_eq!(s.squared_distance(&p), 1.0, epsilon = TOL);
    }

    #[test]
    fn default_is_zero_length_at_origin() {
        let s = Segment3::default();
        assert_eq!(*s.source(), Point3::origin());
        assert_eq!(*s.target(), Point3::origin());
        assert!(s.is_degenerate());
    }

    #[test]
    fn single_precision_queries() {
        let s = Segment2f::new(Point2f::new(0.0, 0.0), Point2f::new(10.0, 0.0));
        let p = Point2f::new(5.0, 5.0);
        assert!(s.projected_inside(&p));
        assert_relative_eq!(s.squared_distance(&p), 25.0_f32, epsilon = 1e-4);
        assert_relative_eq!(s.closest_point(&p), Point2f::new(5.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn from_tuple() {
        let s: Segment2 = (Point2::new(0.0, 0.0), Point2::new(0.0, 2.0)).into();
        assert_relative_eq!(s.midpoint(), Point2::new(0.0, 1.0), epsilon = TOL);
    }
}
