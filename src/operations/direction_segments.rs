use tracing::{debug, instrument};

use crate::error::{OperationError, Result};
use crate::geometry::Segment3;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Builds one segment per anchor point, pointing along its direction.
///
/// Typical input is face centers paired with face normals; the output is
/// ready for a line renderer once [`flatten`]ed.
pub struct DirectionSegments<'a> {
    samples: &'a [(Point3, Vector3)],
    length: f64,
}

impl<'a> DirectionSegments<'a> {
    /// Creates the operation with an absolute segment `length`.
    #[must_use]
    pub fn new(samples: &'a [(Point3, Vector3)], length: f64) -> Self {
        Self { samples, length }
    }

    /// Creates the operation with a length equal to `fraction` of the
    /// diagonal of the anchors' axis-aligned bounding box.
    #[must_use]
    pub fn with_relative_length(samples: &'a [(Point3, Vector3)], fraction: f64) -> Self {
        let length = bounding_diagonal(samples.iter().map(|(p, _)| p)) * fraction;
        Self { samples, length }
    }

    /// Returns the segment length this operation will use.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the length is not a positive
    /// finite number or if any direction vector has zero length.
    #[instrument(skip(self), fields(samples = self.samples.len(), length = self.length))]
    pub fn execute(&self) -> Result<Vec<Segment3>> {
        if !self.length.is_finite() || self.length <= TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "segment length must be positive, got {}",
                self.length
            ))
            .into());
        }

        let segments = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, (anchor, direction))| -> Result<Segment3> {
                let unit = direction.try_normalize(TOLERANCE).ok_or_else(|| {
                    OperationError::InvalidInput(format!("zero direction at sample {i}"))
                })?;
                Ok(Segment3::new(*anchor, anchor + unit * self.length))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = segments.len(), "built direction segments");
        Ok(segments)
    }
}

/// Flattens segments into consecutive `(source, target)` point pairs.
#[must_use]
pub fn flatten(segments: &[Segment3]) -> Vec<Point3> {
    segments
        .iter()
        .flat_map(|s| [*s.source(), *s.target()])
        .collect()
}

fn bounding_diagonal<'p>(points: impl Iterator<Item = &'p Point3>) -> f64 {
    let mut bounds: Option<(Point3, Point3)> = None;
    for p in points {
        bounds = Some(match bounds {
            None => (*p, *p),
            Some((lo, hi)) => (lo.inf(p), hi.sup(p)),
        });
    }
    bounds.map_or(0.0, |(lo, hi)| (hi - lo).norm())
}
