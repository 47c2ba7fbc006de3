//! Rao-Blackwellized particle-filter object tracker.

use nalgebra::DVector;
use parking_lot::Mutex;
use tracing::debug;

use crate::common::rng::SimpleRng;
use crate::filter::{CoordinateParticleFilter, TrackerError};
use crate::model::{ObjectModel, ObservationModel};
use crate::process::IntegratedDampedWienerProcess;
use crate::state::{to_center_coordinates, to_model_coordinates, PoseState, PART_DIM, PART_DOF};

use super::config::{TrackerConfig, TrackerConfigSnapshot};
use super::smoothing::move_average;

/// 6-DoF pose tracker over a multi-part rigid object.
///
/// Each `track` call runs one propagation pass of the particle filter in
/// center coordinates, re-centers the belief around its mean, folds that
/// mean into the integrated-pose accumulator and low-pass filters the
/// resulting model-coordinate pose into the reported estimate.
///
/// `initialize` and `track` are mutually exclusive: a single lock guards
/// the belief, the coordinate re-centering and the moving-average update
/// as one atomic unit. There is no cancellation or timeout at this layer;
/// callers needing deadlines must bound the call externally.
pub struct RbpfTracker<O: ObservationModel> {
    core: Mutex<TrackerCore<O>>,
}

struct TrackerCore<O: ObservationModel> {
    filter: CoordinateParticleFilter<O>,
    object_model: ObjectModel,
    config: TrackerConfig,
    rng: SimpleRng,
    moving_average: PoseState,
    initialized: bool,
}

impl<O: ObservationModel> RbpfTracker<O> {
    /// Create a tracker for the given object.
    ///
    /// Fails with a configuration error when the config is out of range or
    /// when the evaluation budget resolves to zero particles for this
    /// object's part count.
    pub fn new(
        observation_model: O,
        object_model: ObjectModel,
        config: TrackerConfig,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let part_count = object_model.part_count();
        if config.evaluation_count / part_count == 0 {
            return Err(TrackerError::Configuration {
                description: format!(
                    "evaluation count {} resolves to zero particles for {} parts",
                    config.evaluation_count, part_count
                ),
            });
        }

        let mut transition_model =
            IntegratedDampedWienerProcess::new(config.delta_time, PART_DIM)?;
        transition_model.set_parameters(config.damping, config.acceleration_covariance());

        let filter =
            CoordinateParticleFilter::new(observation_model, transition_model, part_count)?;
        let rng = SimpleRng::new(config.seed);
        let moving_average = PoseState::zeros(part_count);

        Ok(Self {
            core: Mutex::new(TrackerCore {
                filter,
                object_model,
                config,
                rng,
                moving_average,
                initialized: false,
            }),
        })
    }

    /// Seed the belief from pose hypotheses and run one propagation pass
    /// against the given observation.
    ///
    /// Hypotheses are converted to center coordinates, propagated once with
    /// zero input, resampled down to the per-part particle budget and
    /// re-centered around their mean. Velocities are reset to zero because
    /// the change of reference frame changes what "linear velocity"
    /// measures. The mean seeds the integrated-pose accumulator and, in
    /// model coordinates, the moving average.
    pub fn initialize(
        &self,
        initial_states: &[PoseState],
        observation: &O::Observation,
    ) -> Result<(), TrackerError> {
        let mut guard = self.core.lock();
        let core = &mut *guard;

        if initial_states.is_empty() {
            return Err(TrackerError::Configuration {
                description: "at least one initial pose hypothesis is required".to_string(),
            });
        }
        let part_count = core.object_model.part_count();
        for state in initial_states {
            if state.part_count() != part_count {
                return Err(TrackerError::DimensionMismatch {
                    expected: part_count,
                    actual: state.part_count(),
                    context: "initial state part count".to_string(),
                });
            }
        }
        let target = core.config.evaluation_count / part_count;

        let centers = core.object_model.part_centers();
        let centered: Vec<PoseState> = initial_states
            .iter()
            .map(|state| to_center_coordinates(state, centers))
            .collect();

        core.filter.set_particles(centered)?;
        let input = zero_input(part_count);
        core.filter.filter(observation, &input, &mut core.rng)?;
        core.filter.resample(target, &mut core.rng)?;

        let delta_mean = core.filter.belief().mean();
        for i in 0..core.filter.belief().size() {
            let location = core.filter.belief_mut().location_mut(i);
            location.center_around(&delta_mean);
            location.set_zero_velocity();
        }

        core.filter
            .observation_model_mut()
            .integrated_poses_mut()
            .apply_delta(&delta_mean);
        core.moving_average = to_model_coordinates(
            core.filter.observation_model().integrated_poses(),
            core.object_model.part_centers(),
        );
        core.initialized = true;

        debug!(
            particles = core.filter.belief().size(),
            hypotheses = initial_states.len(),
            "tracker initialized"
        );
        Ok(())
    }

    /// Advance the belief by one observation and return the smoothed pose
    /// estimate in model coordinates.
    ///
    /// Degenerate beliefs reported by the propagation pass are surfaced
    /// unchanged; the tracker performs no retry or re-initialization.
    pub fn track(&self, observation: &O::Observation) -> Result<PoseState, TrackerError> {
        let mut guard = self.core.lock();
        let core = &mut *guard;

        if !core.initialized {
            return Err(TrackerError::NotInitialized);
        }

        let part_count = core.object_model.part_count();
        let input = zero_input(part_count);
        core.filter.filter(observation, &input, &mut core.rng)?;

        let delta_mean = core.filter.belief().mean();
        for i in 0..core.filter.belief().size() {
            core.filter
                .belief_mut()
                .location_mut(i)
                .center_around(&delta_mean);
        }

        core.filter
            .observation_model_mut()
            .integrated_poses_mut()
            .apply_delta(&delta_mean);
        let model_state = to_model_coordinates(
            core.filter.observation_model().integrated_poses(),
            core.object_model.part_centers(),
        );
        move_average(
            &model_state,
            &mut core.moving_average,
            core.config.update_rate,
        );

        Ok(core.moving_average.clone())
    }

    /// Snapshot of the active configuration.
    pub fn config_snapshot(&self) -> TrackerConfigSnapshot {
        TrackerConfigSnapshot::from(&self.core.lock().config)
    }

    /// Diagnostic clone of the current belief.
    ///
    /// Taken under the tracker lock; intended for inspection and tests,
    /// not for the per-frame hot path.
    pub fn belief_snapshot(&self) -> crate::filter::Belief {
        self.core.lock().filter.belief().clone()
    }
}

/// Zero acceleration drive: pure diffusion prediction.
fn zero_input(part_count: usize) -> DVector<f64> {
    DVector::zeros(part_count * PART_DOF)
}
