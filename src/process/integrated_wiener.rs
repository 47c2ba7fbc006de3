//! Integrated damped Wiener process over a joint position/velocity state.

use nalgebra::{DMatrix, DVector};
use statrs::function::gamma;

use crate::common::constants::{EULER_MASCHERONI, INCOMPLETE_GAMMA_EPSILON};
use crate::filter::errors::TrackerError;

use super::damped_wiener::DampedWienerProcess;
use super::gaussian::Gaussian;
use super::traits::StochasticMap;

/// Transition model for a `[position | velocity]` state of dimension 2·DoF.
///
/// The position block is the damped velocity process integrated once; its
/// conditional distribution (given the previous velocity) has a closed-form
/// mean and covariance. The velocity block is delegated to the inner
/// [`DampedWienerProcess`].
///
/// Sampling feeds the *same* DoF-dimensional standard-normal draw to both
/// blocks. The shared randomness couples the position and velocity samples
/// the way the underlying process does; it is not an aliasing bug and must
/// be preserved.
#[derive(Debug, Clone)]
pub struct IntegratedDampedWienerProcess {
    damping: f64,
    acceleration_covariance: DMatrix<f64>,
    delta_time: f64,
    position_distribution: Gaussian,
    velocity_process: DampedWienerProcess,
}

impl IntegratedDampedWienerProcess {
    /// Create a transition model for a state of `state_dimension` rows.
    ///
    /// The dimension must split evenly into a position-like and a
    /// velocity-like half; anything else is a configuration error.
    pub fn new(delta_time: f64, state_dimension: usize) -> Result<Self, TrackerError> {
        if state_dimension == 0 || state_dimension % 2 != 0 {
            return Err(TrackerError::Configuration {
                description: format!(
                    "state dimension must be an even, positive number, got {}",
                    state_dimension
                ),
            });
        }
        let dof = state_dimension / 2;
        Ok(Self {
            damping: 1.0,
            acceleration_covariance: DMatrix::identity(dof, dof),
            delta_time,
            position_distribution: Gaussian::standard(dof),
            velocity_process: DampedWienerProcess::new(delta_time, dof)?,
        })
    }

    /// Configure damping and the acceleration covariance operator; both are
    /// propagated to the inner velocity process.
    pub fn set_parameters(&mut self, damping: f64, acceleration_covariance: DMatrix<f64>) {
        debug_assert_eq!(acceleration_covariance.nrows(), self.input_dimension());
        self.damping = damping;
        self.acceleration_covariance = acceleration_covariance.clone();
        self.velocity_process
            .set_parameters(damping, acceleration_covariance);
    }

    /// Full state dimension (2·DoF).
    #[inline]
    pub fn state_dimension(&self) -> usize {
        self.input_dimension() * 2
    }

    /// Control-input dimension (= DoF = noise dimension).
    #[inline]
    pub fn input_dimension(&self) -> usize {
        self.velocity_process.dimension()
    }

    /// Conditioned distribution of the next position block.
    pub fn position_distribution(&self) -> &Gaussian {
        &self.position_distribution
    }

    /// Inner velocity process.
    pub fn velocity_process(&self) -> &DampedWienerProcess {
        &self.velocity_process
    }

    fn position_mean(
        &self,
        position: &DVector<f64>,
        velocity: &DVector<f64>,
        acceleration: &DVector<f64>,
    ) -> DVector<f64> {
        let damping = self.damping;
        let dt = self.delta_time;
        let decay = (-damping * dt).exp();

        let mean = position
            + acceleration * ((decay + damping * dt - 1.0) / damping.powi(2))
            + velocity * ((1.0 - decay) / damping);

        if mean.norm().is_finite() {
            mean
        } else {
            position + acceleration * (0.5 * dt * dt) + velocity * dt
        }
    }

    fn position_covariance(&self) -> DMatrix<f64> {
        let damping = self.damping;
        let dt = self.delta_time;
        let x = 2.0 * damping * dt;

        // The exact solution contains Γ(0, x), which is finite for x > 0 but
        // incomplete-gamma routines reject a first argument of exactly zero;
        // a tiny positive epsilon is indistinguishable for any realistic dt.
        // At x == 0 the full gamma function matches the boost convention
        // Γ(a, 0) = Γ(a), and ln(0) drives the factor non-finite anyway.
        let upper_tail = if x > 0.0 {
            gamma::gamma_ui(INCOMPLETE_GAMMA_EPSILON, x)
        } else {
            gamma::gamma(INCOMPLETE_GAMMA_EPSILON)
        };

        let mut factor = (-1.0 + (-x).exp()) / (8.0 * damping.powi(3))
            + (2.0 - (-x).exp()) / (4.0 * damping.powi(2)) * dt
            + (-1.5 + EULER_MASCHERONI + upper_tail + x.ln()) / (2.0 * damping) * dt.powi(2);

        if !factor.is_finite() {
            factor = dt.powi(3) / 3.0;
        }
        &self.acceleration_covariance * factor
    }
}

impl StochasticMap for IntegratedDampedWienerProcess {
    fn condition(&mut self, state: &DVector<f64>, input: &DVector<f64>) {
        debug_assert_eq!(state.len(), self.state_dimension());
        debug_assert_eq!(input.len(), self.input_dimension());

        let dof = self.input_dimension();
        let position = state.rows(0, dof).clone_owned();
        let velocity = state.rows(dof, dof).clone_owned();

        let mean = self.position_mean(&position, &velocity, input);
        let covariance = self.position_covariance();
        self.position_distribution.set_mean(mean);
        self.position_distribution.set_covariance(covariance);

        self.velocity_process.condition(&velocity, input);
    }

    fn map_standard_normal(&self, noise: &DVector<f64>) -> DVector<f64> {
        debug_assert_eq!(noise.len(), self.input_dimension());
        let dof = self.input_dimension();

        let mut next = DVector::zeros(self.state_dimension());
        next.rows_mut(0, dof)
            .copy_from(&self.position_distribution.map_standard_normal(noise));
        next.rows_mut(dof, dof)
            .copy_from(&self.velocity_process.map_standard_normal(noise));
        next
    }

    fn noise_dimension(&self) -> usize {
        self.input_dimension()
    }
}
