//! End-to-end behavior of the RBPF tracker against synthetic observations.

mod helpers;

use helpers::{pose_at, scatter_hypotheses, SyntheticPoseSensor};
use nalgebra::Vector3;
use pose_rbpf_rs::common::rng::SimpleRng;
use pose_rbpf_rs::model::ObjectModel;
use pose_rbpf_rs::state::{to_center_coordinates, PoseState};
use pose_rbpf_rs::tracker::{RbpfTracker, TrackerConfig};

fn single_part_tracker(
    config: TrackerConfig,
    center: Vector3<f64>,
) -> RbpfTracker<SyntheticPoseSensor> {
    let sensor = SyntheticPoseSensor::new(1, 0.01, 0.05);
    let object = ObjectModel::single(center);
    RbpfTracker::new(sensor, object, config).unwrap()
}

#[test]
fn velocities_are_zeroed_on_initialize() {
    let config = TrackerConfig::builder()
        .damping(5.0)
        .delta_time(1.0 / 30.0)
        .linear_acceleration_sigma(0.0)
        .angular_acceleration_sigma(0.0)
        .evaluation_count(32)
        .seed(11)
        .build();
    let tracker = single_part_tracker(config, Vector3::new(0.0, 0.0, 0.05));

    let truth = pose_at(Vector3::new(0.2, -0.1, 0.6));
    let mut rng = SimpleRng::new(99);
    // scatter_hypotheses injects large arbitrary velocities on purpose
    let hypotheses = scatter_hypotheses(&mut rng, &truth, 16, 0.05);

    let centers = [Vector3::new(0.0, 0.0, 0.05)];
    let observation = to_center_coordinates(&truth, &centers);
    tracker.initialize(&hypotheses, &observation).unwrap();

    let belief = tracker.belief_snapshot();
    assert!(belief.size() > 0);
    for i in 0..belief.size() {
        let particle = belief.location(i);
        assert_eq!(particle.linear_velocity(0), Vector3::zeros());
        assert_eq!(particle.angular_velocity(0), Vector3::zeros());
    }
}

#[test]
fn initialize_resamples_to_budget_over_parts() {
    let sensor = SyntheticPoseSensor::new(2, 0.01, 0.05);
    let centers = [Vector3::new(0.0, 0.0, 0.1), Vector3::new(0.1, 0.0, 0.0)];
    let object = ObjectModel::new(centers).unwrap();
    let config = TrackerConfig::builder().evaluation_count(50).seed(3).build();
    let tracker = RbpfTracker::new(sensor, object, config).unwrap();

    let truth = PoseState::zeros(2);
    let observation = to_center_coordinates(&truth, &centers);
    tracker.initialize(&[truth], &observation).unwrap();

    // 50 evaluations / 2 parts = 25 particles
    assert_eq!(tracker.belief_snapshot().size(), 25);
}

#[test]
fn static_target_with_zero_noise_floor_converges() {
    // λ = 5, Δt = 1/30, zero process noise: the belief cannot diffuse, so
    // convergence comes purely from reweighting, resampling and the
    // re-centering of the integrated pose.
    let config = TrackerConfig::builder()
        .damping(5.0)
        .delta_time(1.0 / 30.0)
        .linear_acceleration_sigma(0.0)
        .angular_acceleration_sigma(0.0)
        .update_rate(0.3)
        .evaluation_count(64)
        .seed(21)
        .build();
    let center = Vector3::new(0.0, 0.0, 0.05);
    let tracker = single_part_tracker(config, center);

    let truth = pose_at(Vector3::new(0.4, 0.2, 0.8));
    let centers = [center];
    let observation = to_center_coordinates(&truth, &centers);

    let mut rng = SimpleRng::new(5);
    let hypotheses = scatter_hypotheses(&mut rng, &truth, 64, 0.05);
    tracker.initialize(&hypotheses, &observation).unwrap();

    let mut estimate = PoseState::zeros(1);
    for _ in 0..60 {
        estimate = tracker.track(&observation).unwrap();
    }

    let error = (estimate.position(0) - truth.position(0)).norm();
    assert!(
        error < 0.05,
        "tracked position should settle near ground truth, error = {}",
        error
    );
}

#[test]
fn drifting_target_is_followed_with_noise_floor() {
    let config = TrackerConfig::builder()
        .damping(5.0)
        .delta_time(1.0 / 30.0)
        .linear_acceleration_sigma(0.5)
        .angular_acceleration_sigma(0.05)
        .update_rate(0.5)
        .evaluation_count(128)
        .seed(8)
        .build();
    let center = Vector3::zeros();
    let tracker = single_part_tracker(config, center);

    let start = Vector3::new(0.0, 0.0, 0.5);
    let velocity = Vector3::new(0.3, 0.0, 0.0); // m/s
    let dt = 1.0 / 30.0;

    let mut rng = SimpleRng::new(13);
    let hypotheses = scatter_hypotheses(&mut rng, &pose_at(start), 128, 0.02);
    tracker
        .initialize(&hypotheses, &pose_at(start))
        .unwrap();

    let frames = 90;
    let mut estimate = PoseState::zeros(1);
    let mut truth = start;
    for frame in 1..=frames {
        truth = start + velocity * (frame as f64 * dt);
        estimate = tracker.track(&pose_at(truth)).unwrap();
    }

    let error = (estimate.position(0) - truth).norm();
    assert!(
        error < 0.1,
        "tracker should follow a slow drift, final error = {}",
        error
    );
}

#[test]
fn tracking_is_deterministic_for_a_seed() {
    let run = || {
        let config = TrackerConfig::builder()
            .damping(5.0)
            .linear_acceleration_sigma(0.1)
            .evaluation_count(32)
            .seed(77)
            .build();
        let tracker = single_part_tracker(config, Vector3::zeros());

        let truth = pose_at(Vector3::new(0.1, 0.2, 0.3));
        let mut rng = SimpleRng::new(4);
        let hypotheses = scatter_hypotheses(&mut rng, &truth, 32, 0.03);
        tracker.initialize(&hypotheses, &truth).unwrap();

        let mut last = PoseState::zeros(1);
        for _ in 0..10 {
            last = tracker.track(&truth).unwrap();
        }
        last.as_vector().clone()
    };

    assert_eq!(run(), run());
}

#[test]
fn reported_pose_is_smoothed_not_raw() {
    // With a small update rate the reported estimate must lag a sudden
    // observation jump instead of snapping to it.
    let config = TrackerConfig::builder()
        .damping(5.0)
        .linear_acceleration_sigma(0.2)
        .update_rate(0.05)
        .evaluation_count(64)
        .seed(31)
        .build();
    let tracker = single_part_tracker(config, Vector3::zeros());

    let origin = pose_at(Vector3::zeros());
    let mut rng = SimpleRng::new(17);
    let hypotheses = scatter_hypotheses(&mut rng, &origin, 64, 0.01);
    tracker.initialize(&hypotheses, &origin).unwrap();

    let jumped = pose_at(Vector3::new(0.5, 0.0, 0.0));
    let estimate = tracker.track(&jumped).unwrap();
    assert!(
        estimate.position(0).x < 0.25,
        "one low-rate update must not absorb the full jump, got {}",
        estimate.position(0).x
    );
}
