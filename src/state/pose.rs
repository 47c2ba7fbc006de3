//! Multi-part pose/velocity state vectors.
//!
//! A [`PoseState`] stacks one block per tracked part. Each block holds the
//! part's pose half (position + axis-angle orientation) followed by its
//! velocity half (linear + angular velocity), so a block is exactly the
//! `2·DoF` state the transition model expects.

use nalgebra::{DVector, Quaternion, Rotation3, UnitQuaternion, Vector3};

use crate::filter::errors::TrackerError;

/// Degrees of freedom of a single rigid part (3 translational + 3 rotational).
pub const PART_DOF: usize = 6;

/// Length of one part's block: pose half plus velocity half.
pub const PART_DIM: usize = 2 * PART_DOF;

/// Stacked `[position | orientation | linear velocity | angular velocity]`
/// state of a multi-part object.
///
/// Orientations are stored as axis-angle (exponential-coordinate) vectors so
/// the whole state lives in a plain vector space; the quaternion accessors
/// bridge to the group representation where composition or blending needs it.
///
/// During filtering a `PoseState` usually holds a *delta* pose relative to an
/// accumulated reference pose (see [`apply_delta`](PoseState::apply_delta)
/// and [`center_around`](PoseState::center_around)); in that role positions
/// compose additively and orientations multiplicatively, which is what makes
/// center coordinates worth the trouble.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseState {
    data: DVector<f64>,
}

impl PoseState {
    /// Identity state (zero pose, zero velocity) for `part_count` parts.
    pub fn zeros(part_count: usize) -> Self {
        Self {
            data: DVector::zeros(part_count * PART_DIM),
        }
    }

    /// Wrap a raw state vector; its length must be a positive multiple of
    /// the per-part block size.
    pub fn from_vector(data: DVector<f64>) -> Result<Self, TrackerError> {
        if data.is_empty() || data.len() % PART_DIM != 0 {
            return Err(TrackerError::Configuration {
                description: format!(
                    "state vector length {} is not a positive multiple of {}",
                    data.len(),
                    PART_DIM
                ),
            });
        }
        Ok(Self { data })
    }

    /// Number of parts in this state.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.data.len() / PART_DIM
    }

    /// Full state dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Raw state vector.
    #[inline]
    pub fn as_vector(&self) -> &DVector<f64> {
        &self.data
    }

    /// One part's `[pose half | velocity half]` block as an owned vector.
    pub fn part_state(&self, part: usize) -> DVector<f64> {
        self.data.rows(part * PART_DIM, PART_DIM).clone_owned()
    }

    /// Overwrite one part's block.
    pub fn set_part_state(&mut self, part: usize, block: &DVector<f64>) {
        debug_assert_eq!(block.len(), PART_DIM);
        self.data
            .rows_mut(part * PART_DIM, PART_DIM)
            .copy_from(block);
    }

    /// Position of a part.
    pub fn position(&self, part: usize) -> Vector3<f64> {
        self.fixed_block(part * PART_DIM)
    }

    /// Set the position of a part.
    pub fn set_position(&mut self, part: usize, position: &Vector3<f64>) {
        self.set_fixed_block(part * PART_DIM, position);
    }

    /// Orientation of a part as an axis-angle vector.
    pub fn orientation(&self, part: usize) -> Vector3<f64> {
        self.fixed_block(part * PART_DIM + 3)
    }

    /// Set the orientation of a part from an axis-angle vector.
    pub fn set_orientation(&mut self, part: usize, orientation: &Vector3<f64>) {
        self.set_fixed_block(part * PART_DIM + 3, orientation);
    }

    /// Orientation of a part as a unit quaternion.
    pub fn quaternion(&self, part: usize) -> UnitQuaternion<f64> {
        UnitQuaternion::from_scaled_axis(self.orientation(part))
    }

    /// Set the orientation of a part from a unit quaternion.
    pub fn set_quaternion(&mut self, part: usize, quaternion: &UnitQuaternion<f64>) {
        self.set_orientation(part, &quaternion.scaled_axis());
    }

    /// Rotation matrix of a part's orientation.
    pub fn rotation(&self, part: usize) -> Rotation3<f64> {
        self.quaternion(part).to_rotation_matrix()
    }

    /// Linear velocity of a part.
    pub fn linear_velocity(&self, part: usize) -> Vector3<f64> {
        self.fixed_block(part * PART_DIM + 6)
    }

    /// Set the linear velocity of a part.
    pub fn set_linear_velocity(&mut self, part: usize, velocity: &Vector3<f64>) {
        self.set_fixed_block(part * PART_DIM + 6, velocity);
    }

    /// Angular velocity of a part.
    pub fn angular_velocity(&self, part: usize) -> Vector3<f64> {
        self.fixed_block(part * PART_DIM + 9)
    }

    /// Set the angular velocity of a part.
    pub fn set_angular_velocity(&mut self, part: usize, velocity: &Vector3<f64>) {
        self.set_fixed_block(part * PART_DIM + 9, velocity);
    }

    /// Zero both velocity sub-vectors of every part.
    ///
    /// Switching the frame of reference changes what "linear velocity"
    /// measures: rotation about the new origin contributes a spurious linear
    /// term. Resetting avoids injecting that term into the next prediction.
    pub fn set_zero_velocity(&mut self) {
        for part in 0..self.part_count() {
            self.data
                .rows_mut(part * PART_DIM + PART_DOF, PART_DOF)
                .fill(0.0);
        }
    }

    /// Accumulate a pose delta into this state, per part:
    /// `p ← p + p_δ`, `q ← q_δ·q`. Velocities are untouched.
    pub fn apply_delta(&mut self, delta: &PoseState) {
        debug_assert_eq!(self.part_count(), delta.part_count());
        for part in 0..self.part_count() {
            let position = self.position(part) + delta.position(part);
            self.set_position(part, &position);
            let quaternion = delta.quaternion(part) * self.quaternion(part);
            self.set_quaternion(part, &quaternion);
        }
    }

    /// Re-express this state as a delta relative to `mean`, per part:
    /// `p ← p − p_m`, `q ← q·q_m⁻¹`. Velocities are untouched.
    ///
    /// Paired with [`apply_delta`](PoseState::apply_delta) on an accumulator
    /// this telescopes: resolving the re-centered state against the updated
    /// accumulator yields the same absolute pose as before (see
    /// [`compose_onto`](PoseState::compose_onto)).
    pub fn center_around(&mut self, mean: &PoseState) {
        debug_assert_eq!(self.part_count(), mean.part_count());
        for part in 0..self.part_count() {
            let position = self.position(part) - mean.position(part);
            self.set_position(part, &position);
            let quaternion = self.quaternion(part) * mean.quaternion(part).inverse();
            self.set_quaternion(part, &quaternion);
        }
    }

    /// Resolve this delta state against an accumulated pose, per part:
    /// `p = p_self + p_acc`, `q = q_self·q_acc`. Velocities are copied from
    /// `self`.
    ///
    /// Observation models use this to turn a particle's delta into the
    /// absolute pose they evaluate.
    pub fn compose_onto(&self, accumulated: &PoseState) -> PoseState {
        debug_assert_eq!(self.part_count(), accumulated.part_count());
        let mut absolute = self.clone();
        for part in 0..self.part_count() {
            let position = self.position(part) + accumulated.position(part);
            absolute.set_position(part, &position);
            let quaternion = self.quaternion(part) * accumulated.quaternion(part);
            absolute.set_quaternion(part, &quaternion);
        }
        absolute
    }

    fn fixed_block(&self, offset: usize) -> Vector3<f64> {
        Vector3::new(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        )
    }

    fn set_fixed_block(&mut self, offset: usize, value: &Vector3<f64>) {
        self.data[offset] = value[0];
        self.data[offset + 1] = value[1];
        self.data[offset + 2] = value[2];
    }
}

/// Normalize a blended quaternion coefficient vector back onto the unit
/// sphere. Coefficients are in nalgebra order `[i, j, k, w]`.
pub(crate) fn unit_quaternion_from_coords(
    coords: nalgebra::Vector4<f64>,
) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(
        coords[3], coords[0], coords[1], coords[2],
    ))
}
