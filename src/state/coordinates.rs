//! Transforms between model and center coordinate systems.
//!
//! Model coordinates place every part's origin at its reference frame;
//! center coordinates place it at the part's centroid. Filtering runs in
//! center coordinates because there the coupling between angular and linear
//! velocity disappears, which is what lets the pose algebra in
//! [`PoseState`](crate::state::PoseState) treat positions additively.

use nalgebra::Vector3;

use super::pose::PoseState;

/// Shift every part's origin from its model frame to its centroid:
/// `position_j += R(orientation_j)·center_j`.
pub fn to_center_coordinates(state: &PoseState, centers: &[Vector3<f64>]) -> PoseState {
    debug_assert_eq!(state.part_count(), centers.len());
    let mut centered = state.clone();
    for part in 0..state.part_count() {
        let position = state.position(part) + state.rotation(part) * centers[part];
        centered.set_position(part, &position);
    }
    centered
}

/// Exact inverse of [`to_center_coordinates`]:
/// `position_j -= R(orientation_j)·center_j`.
pub fn to_model_coordinates(state: &PoseState, centers: &[Vector3<f64>]) -> PoseState {
    debug_assert_eq!(state.part_count(), centers.len());
    let mut model = state.clone();
    for part in 0..state.part_count() {
        let position = state.position(part) - state.rotation(part) * centers[part];
        model.set_position(part, &position);
    }
    model
}
