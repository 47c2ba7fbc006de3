//! Damped Wiener process over a velocity-like variable.

use nalgebra::{DMatrix, DVector};

use crate::filter::errors::TrackerError;

use super::gaussian::Gaussian;
use super::traits::StochasticMap;

/// Linear-Gaussian velocity process with mean reversion.
///
/// The velocity decays toward zero at the damping rate λ while being driven
/// by an acceleration input and Gaussian process noise:
///
/// `v' ~ N( e^{-λΔt}·v + (1 − e^{-λΔt})/λ · a ,  (1 − e^{-2λΔt})/(2λ) · Σ_a )`
///
/// Both closed forms are singular at λ = 0 in floating point even though the
/// physical limit is smooth. Whenever a computed value turns out non-finite
/// the analytic λ→0 limit is substituted (`v + Δt·a` and `Δt·Σ_a`). The
/// trigger is the non-finite check alone, never a magnitude threshold on λ,
/// so behavior at every other λ stays bit-for-bit the closed form.
#[derive(Debug, Clone)]
pub struct DampedWienerProcess {
    damping: f64,
    acceleration_covariance: DMatrix<f64>,
    delta_time: f64,
    distribution: Gaussian,
}

impl DampedWienerProcess {
    /// Create a process over a velocity of the given dimension.
    ///
    /// Parameters default to unit damping and unit acceleration covariance
    /// until [`set_parameters`](DampedWienerProcess::set_parameters) is
    /// called.
    pub fn new(delta_time: f64, dimension: usize) -> Result<Self, TrackerError> {
        if dimension == 0 {
            return Err(TrackerError::Configuration {
                description: "velocity dimension must be positive".to_string(),
            });
        }
        Ok(Self {
            damping: 1.0,
            acceleration_covariance: DMatrix::identity(dimension, dimension),
            delta_time,
            distribution: Gaussian::standard(dimension),
        })
    }

    /// Configure the damping rate and the acceleration covariance operator.
    pub fn set_parameters(&mut self, damping: f64, acceleration_covariance: DMatrix<f64>) {
        debug_assert_eq!(acceleration_covariance.nrows(), self.dimension());
        debug_assert_eq!(acceleration_covariance.ncols(), self.dimension());
        self.damping = damping;
        self.acceleration_covariance = acceleration_covariance;
    }

    /// Velocity dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.distribution.dimension()
    }

    /// Conditioned distribution of the next velocity.
    pub fn distribution(&self) -> &Gaussian {
        &self.distribution
    }

    fn mean(&self, velocity: &DVector<f64>, input: &DVector<f64>) -> DVector<f64> {
        let decay = (-self.damping * self.delta_time).exp();
        let mean = velocity * decay + input * ((1.0 - decay) / self.damping);

        if mean.norm().is_finite() {
            mean
        } else {
            velocity + input * self.delta_time
        }
    }

    fn covariance(&self) -> DMatrix<f64> {
        let mut factor =
            (1.0 - (-2.0 * self.damping * self.delta_time).exp()) / (2.0 * self.damping);
        if !factor.is_finite() {
            factor = self.delta_time;
        }
        &self.acceleration_covariance * factor
    }
}

impl StochasticMap for DampedWienerProcess {
    fn condition(&mut self, state: &DVector<f64>, input: &DVector<f64>) {
        debug_assert_eq!(state.len(), self.dimension());
        debug_assert_eq!(input.len(), self.dimension());
        let mean = self.mean(state, input);
        let covariance = self.covariance();
        self.distribution.set_mean(mean);
        self.distribution.set_covariance(covariance);
    }

    fn map_standard_normal(&self, noise: &DVector<f64>) -> DVector<f64> {
        self.distribution.map_standard_normal(noise)
    }

    fn noise_dimension(&self) -> usize {
        self.dimension()
    }
}
