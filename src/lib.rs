/*!
# pose-rbpf-rs - Depth-based 6-DoF object pose tracking

Rao-Blackwellized particle filter for estimating the pose (and its
derivatives) of rigid multi-part objects over time from noisy depth-camera
observations.

## Features

- Integrated damped Wiener process transition model with closed-form
  moments and numerically stable λ→0 fallbacks
- Coordinate particle filter with systematic resampling and per-step
  re-centering of the belief
- Quaternion-aware moving-average smoothing of the reported pose
- Deterministic runs from a single seed

## Modules

- [`process`] - stochastic transition models (Gaussian, damped Wiener,
  integrated damped Wiener)
- [`state`] - multi-part pose states and model/center coordinate transforms
- [`filter`] - belief representation and the particle-filter primitive
- [`model`] - object-geometry and observation-likelihood contracts
- [`tracker`] - the RBPF tracker, its configuration and output smoothing
- [`common`] - deterministic RNG and numerical constants

## Example

```rust,no_run
use nalgebra::{DVector, Vector3};
use pose_rbpf_rs::model::{ObjectModel, ObservationModel};
use pose_rbpf_rs::state::PoseState;
use pose_rbpf_rs::tracker::{RbpfTracker, TrackerConfig};

// A toy likelihood model; real deployments render depth images instead.
struct PointSensor {
    integrated: PoseState,
}

impl ObservationModel for PointSensor {
    type Observation = Vector3<f64>;

    fn log_likelihoods(
        &mut self,
        observation: &Vector3<f64>,
        states: &[PoseState],
    ) -> DVector<f64> {
        DVector::from_fn(states.len(), |i, _| {
            let pose = states[i].compose_onto(&self.integrated);
            -(pose.position(0) - observation).norm_squared()
        })
    }

    fn integrated_poses(&self) -> &PoseState {
        &self.integrated
    }

    fn integrated_poses_mut(&mut self) -> &mut PoseState {
        &mut self.integrated
    }
}

let sensor = PointSensor { integrated: PoseState::zeros(1) };
let object = ObjectModel::single(Vector3::zeros());
let config = TrackerConfig::builder().damping(5.0).update_rate(0.2).build();

let tracker = RbpfTracker::new(sensor, object, config).unwrap();
tracker.initialize(&[PoseState::zeros(1)], &Vector3::zeros()).unwrap();
let estimate = tracker.track(&Vector3::new(0.01, 0.0, 0.0)).unwrap();
println!("tracked position: {}", estimate.position(0));
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Deterministic RNG and numerical constants
pub mod common;

/// Belief representation and the particle-filter propagation primitive
pub mod filter;

/// External collaborator contracts (object geometry, observation likelihood)
pub mod model;

/// Stochastic state-transition models
pub mod process;

/// Multi-part pose states and coordinate transforms
pub mod state;

/// The RBPF tracker, its configuration and output smoothing
pub mod tracker;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Core types
pub use state::{PoseState, PART_DIM, PART_DOF};

// Transition models
pub use process::{DampedWienerProcess, Gaussian, IntegratedDampedWienerProcess};

// Capabilities
pub use process::{Moments, StochasticMap};

// Filtering
pub use filter::{Belief, CoordinateParticleFilter, TrackerError};

// Collaborator contracts
pub use model::{ObjectModel, ObservationModel};

// Tracker
pub use tracker::{RbpfTracker, TrackerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
