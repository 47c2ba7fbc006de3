//! Rigid-object composition: per-part centers of mass.

use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::filter::errors::TrackerError;

/// Geometric description of the tracked object as seen by the tracker.
///
/// Mesh loading and rendering live elsewhere; the tracking core only needs
/// the centroid offset of every part, expressed in that part's model frame.
/// SmallVec avoids a heap allocation for typical 1-4 part objects.
#[derive(Debug, Clone)]
pub struct ObjectModel {
    centers: SmallVec<[Vector3<f64>; 4]>,
}

impl ObjectModel {
    /// Create an object model from per-part centroid offsets.
    pub fn new(centers: impl IntoIterator<Item = Vector3<f64>>) -> Result<Self, TrackerError> {
        let centers: SmallVec<[Vector3<f64>; 4]> = centers.into_iter().collect();
        if centers.is_empty() {
            return Err(TrackerError::Configuration {
                description: "object model must have at least one part".to_string(),
            });
        }
        Ok(Self { centers })
    }

    /// Single-part object with the given centroid offset.
    pub fn single(center: Vector3<f64>) -> Self {
        Self {
            centers: smallvec::smallvec![center],
        }
    }

    /// Number of parts.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.centers.len()
    }

    /// Centroid offset of every part, in model coordinates.
    #[inline]
    pub fn part_centers(&self) -> &[Vector3<f64>] {
        &self.centers
    }
}
