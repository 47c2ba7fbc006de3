//! Exponential moving-average blending of multi-part poses.

use crate::state::pose::unit_quaternion_from_coords;
use crate::state::PoseState;

/// Fold `new_state` into `moving_average` with the given update rate.
///
/// Per part, the orientation quaternions are blended on their coefficient
/// vectors and re-normalized. If the two quaternions' dot product is
/// negative the incoming one is negated first: antipodal coefficient
/// vectors represent the same rotation, and blending them without the sign
/// fix would cancel instead of average. All translational and velocity
/// fields blend linearly with the same weights.
///
/// The rate is assumed to lie in (0, 1]; the tracker validates it at
/// construction.
pub fn move_average(new_state: &PoseState, moving_average: &mut PoseState, update_rate: f64) {
    debug_assert_eq!(new_state.part_count(), moving_average.part_count());
    let retain = 1.0 - update_rate;

    for part in 0..moving_average.part_count() {
        let average_q = moving_average.quaternion(part).into_inner().coords;
        let mut new_q = new_state.quaternion(part).into_inner().coords;
        if average_q.dot(&new_q) < 0.0 {
            new_q = -new_q;
        }
        let blended = unit_quaternion_from_coords(average_q * retain + new_q * update_rate);

        let position =
            moving_average.position(part) * retain + new_state.position(part) * update_rate;
        let linear_velocity = moving_average.linear_velocity(part) * retain
            + new_state.linear_velocity(part) * update_rate;
        let angular_velocity = moving_average.angular_velocity(part) * retain
            + new_state.angular_velocity(part) * update_rate;

        moving_average.set_position(part, &position);
        moving_average.set_quaternion(part, &blended);
        moving_average.set_linear_velocity(part, &linear_velocity);
        moving_average.set_angular_velocity(part, &angular_velocity);
    }
}
