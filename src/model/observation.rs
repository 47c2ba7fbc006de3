//! Observation-model contract consumed by the propagation primitive.

use nalgebra::DVector;

use crate::state::PoseState;

/// Likelihood model for depth observations of hypothesized object poses.
///
/// Implementations render or otherwise evaluate each state hypothesis
/// against the observation and return one log-likelihood per hypothesis.
/// How that evaluation happens (GPU silhouette rendering, synthetic
/// sensors in tests) is entirely the implementor's business; the filter
/// core consumes the scores opaquely.
///
/// The model also owns the *integrated poses* accumulator: the cumulative
/// pose that the filter's re-centering steps fold particle deltas into.
/// It lives here because the same accumulator anchors whatever rendering
/// or reprojection the likelihood evaluation performs. Hypotheses handed
/// to [`log_likelihoods`](ObservationModel::log_likelihoods) are delta
/// poses relative to it; resolve them with
/// [`PoseState::compose_onto`].
pub trait ObservationModel {
    /// Observation consumed per tracking step (typically a depth image).
    type Observation;

    /// Log-likelihood of the observation under each state hypothesis.
    ///
    /// Must return exactly one value per hypothesis, in order. Mutable
    /// access permits per-state caches (e.g. occlusion bookkeeping).
    fn log_likelihoods(
        &mut self,
        observation: &Self::Observation,
        states: &[PoseState],
    ) -> DVector<f64>;

    /// Cumulative pose accumulator, in center coordinates.
    fn integrated_poses(&self) -> &PoseState;

    /// Mutable access to the cumulative pose accumulator.
    fn integrated_poses_mut(&mut self) -> &mut PoseState;
}
