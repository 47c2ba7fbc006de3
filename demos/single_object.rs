//! Tracks a single simulated object through a circular sweep and prints the
//! estimate against ground truth every few frames.
//!
//! Run with: cargo run --example single_object

use nalgebra::{DVector, Vector3};
use rand_distr::{Distribution, Normal};

use pose_rbpf_rs::common::rng::{Rng, SimpleRng};
use pose_rbpf_rs::model::{ObjectModel, ObservationModel};
use pose_rbpf_rs::state::PoseState;
use pose_rbpf_rs::tracker::{RbpfTracker, TrackerConfig};

const FRAME_RATE: f64 = 30.0;

/// Synthetic pose sensor: scores hypotheses against a noisy observed pose.
/// A real deployment would render depth images of the hypotheses instead.
struct NoisyPoseSensor {
    integrated: PoseState,
    sigma: f64,
}

impl ObservationModel for NoisyPoseSensor {
    type Observation = PoseState;

    fn log_likelihoods(
        &mut self,
        observation: &PoseState,
        states: &[PoseState],
    ) -> DVector<f64> {
        DVector::from_fn(states.len(), |i, _| {
            let absolute = states[i].compose_onto(&self.integrated);
            let position_error = (absolute.position(0) - observation.position(0)).norm_squared();
            let angle_error = absolute.quaternion(0).angle_to(&observation.quaternion(0));
            -0.5 * (position_error + angle_error * angle_error) / (self.sigma * self.sigma)
        })
    }

    fn integrated_poses(&self) -> &PoseState {
        &self.integrated
    }

    fn integrated_poses_mut(&mut self) -> &mut PoseState {
        &mut self.integrated
    }
}

fn truth_at(frame: usize) -> PoseState {
    let t = frame as f64 / FRAME_RATE;
    let mut truth = PoseState::zeros(1);
    truth.set_position(
        0,
        &Vector3::new(0.3 * (0.5 * t).cos(), 0.3 * (0.5 * t).sin(), 0.8),
    );
    truth.set_orientation(0, &Vector3::new(0.0, 0.0, 0.2 * t));
    truth
}

fn main() {
    tracing_subscriber::fmt().init();

    let sensor = NoisyPoseSensor {
        integrated: PoseState::zeros(1),
        sigma: 0.02,
    };
    let config = TrackerConfig::builder()
        .damping(5.0)
        .delta_time(1.0 / FRAME_RATE)
        .linear_acceleration_sigma(0.5)
        .angular_acceleration_sigma(0.3)
        .update_rate(0.4)
        .evaluation_count(200)
        .seed(42)
        .build();
    let tracker = RbpfTracker::new(sensor, ObjectModel::single(Vector3::zeros()), config)
        .expect("valid tracker configuration");

    // Initial hypotheses scattered around the first ground-truth pose
    let mut rng = SimpleRng::new(1);
    let initial_truth = truth_at(0);
    let hypotheses: Vec<PoseState> = (0..200)
        .map(|_| {
            let mut hypothesis = initial_truth.clone();
            let jitter = Vector3::new(rng.randn(), rng.randn(), rng.randn()) * 0.03;
            hypothesis.set_position(0, &(initial_truth.position(0) + jitter));
            hypothesis
        })
        .collect();

    let observation_noise = Normal::new(0.0, 0.005).expect("valid sigma");
    let observe = |truth: &PoseState, rng: &mut SimpleRng| {
        let mut observed = truth.clone();
        let noise = Vector3::new(
            observation_noise.sample(rng),
            observation_noise.sample(rng),
            observation_noise.sample(rng),
        );
        observed.set_position(0, &(truth.position(0) + noise));
        observed
    };

    tracker
        .initialize(&hypotheses, &observe(&initial_truth, &mut rng))
        .expect("initialize");
    println!("{}", tracker.config_snapshot().to_json_pretty());

    for frame in 1..=300 {
        let truth = truth_at(frame);
        let estimate = tracker
            .track(&observe(&truth, &mut rng))
            .expect("tracking step");

        if frame % 30 == 0 {
            let error = (estimate.position(0) - truth.position(0)).norm();
            println!(
                "frame {:3}  truth ({:+.3} {:+.3} {:+.3})  estimate ({:+.3} {:+.3} {:+.3})  |err| {:.4} m",
                frame,
                truth.position(0).x,
                truth.position(0).y,
                truth.position(0).z,
                estimate.position(0).x,
                estimate.position(0).y,
                estimate.position(0).z,
                error
            );
        }
    }
}
