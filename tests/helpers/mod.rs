//! Shared fixtures for the integration tests.

use nalgebra::{DVector, Vector3};
use pose_rbpf_rs::common::rng::{Rng, SimpleRng};
use pose_rbpf_rs::model::ObservationModel;
use pose_rbpf_rs::state::PoseState;

/// Synthetic pose sensor standing in for the depth-image likelihood model.
///
/// The observation is the true object pose in center coordinates; each
/// hypothesis is scored by a Gaussian on its position and orientation
/// error after resolving the hypothesis against the integrated poses.
pub struct SyntheticPoseSensor {
    integrated: PoseState,
    position_sigma: f64,
    orientation_sigma: f64,
}

impl SyntheticPoseSensor {
    pub fn new(part_count: usize, position_sigma: f64, orientation_sigma: f64) -> Self {
        Self {
            integrated: PoseState::zeros(part_count),
            position_sigma,
            orientation_sigma,
        }
    }
}

impl ObservationModel for SyntheticPoseSensor {
    type Observation = PoseState;

    fn log_likelihoods(
        &mut self,
        observation: &PoseState,
        states: &[PoseState],
    ) -> DVector<f64> {
        DVector::from_fn(states.len(), |i, _| {
            let absolute = states[i].compose_onto(&self.integrated);
            let mut log_likelihood = 0.0;
            for part in 0..observation.part_count() {
                let position_error =
                    (absolute.position(part) - observation.position(part)).norm_squared();
                let orientation_error = absolute
                    .quaternion(part)
                    .angle_to(&observation.quaternion(part));
                log_likelihood -= 0.5 * position_error
                    / (self.position_sigma * self.position_sigma);
                log_likelihood -= 0.5 * orientation_error * orientation_error
                    / (self.orientation_sigma * self.orientation_sigma);
            }
            log_likelihood
        })
    }

    fn integrated_poses(&self) -> &PoseState {
        &self.integrated
    }

    fn integrated_poses_mut(&mut self) -> &mut PoseState {
        &mut self.integrated
    }
}

/// Single-part pose at the given position with identity orientation.
pub fn pose_at(position: Vector3<f64>) -> PoseState {
    let mut state = PoseState::zeros(1);
    state.set_position(0, &position);
    state
}

/// Scatter pose hypotheses around `truth` with the given position spread.
pub fn scatter_hypotheses(
    rng: &mut SimpleRng,
    truth: &PoseState,
    count: usize,
    position_sigma: f64,
) -> Vec<PoseState> {
    (0..count)
        .map(|_| {
            let mut hypothesis = truth.clone();
            for part in 0..truth.part_count() {
                let jitter = Vector3::new(rng.randn(), rng.randn(), rng.randn()) * position_sigma;
                let position = truth.position(part) + jitter;
                hypothesis.set_position(part, &position);
                // Hypotheses arrive with arbitrary velocities; initialize
                // must discard them.
                hypothesis.set_linear_velocity(part, &Vector3::new(0.3, -0.3, 0.15));
                hypothesis.set_angular_velocity(part, &Vector3::new(0.1, 0.1, -0.1));
            }
            hypothesis
        })
        .collect()
}
