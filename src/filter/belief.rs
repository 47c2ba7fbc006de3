//! Weighted particle ensemble over multi-part pose states.

use nalgebra::DVector;

use crate::state::PoseState;

use super::errors::TrackerError;

/// The filter's current weighted set of state hypotheses.
///
/// Owned exclusively by the propagation primitive; the tracker reads and
/// rewrites particle locations during re-centering but never the storage
/// itself. Weights are kept normalized.
#[derive(Debug, Clone)]
pub struct Belief {
    particles: Vec<PoseState>,
    weights: DVector<f64>,
}

impl Belief {
    /// Empty belief; populated via [`set_particles`](Belief::set_particles).
    pub fn empty() -> Self {
        Self {
            particles: Vec::new(),
            weights: DVector::zeros(0),
        }
    }

    /// Replace the ensemble with uniformly weighted particles.
    pub fn set_particles(&mut self, particles: Vec<PoseState>) {
        let count = particles.len();
        self.particles = particles;
        self.weights = if count == 0 {
            DVector::zeros(0)
        } else {
            DVector::from_element(count, 1.0 / count as f64)
        };
    }

    /// Number of particles.
    #[inline]
    pub fn size(&self) -> usize {
        self.particles.len()
    }

    /// Immutable access to a particle's state.
    #[inline]
    pub fn location(&self, index: usize) -> &PoseState {
        &self.particles[index]
    }

    /// Mutable access to a particle's state (used by re-centering).
    #[inline]
    pub fn location_mut(&mut self, index: usize) -> &mut PoseState {
        &mut self.particles[index]
    }

    /// All particle states.
    #[inline]
    pub fn particles(&self) -> &[PoseState] {
        &self.particles
    }

    /// Mutable access to all particle states (used by prediction).
    #[inline]
    pub(crate) fn particles_mut(&mut self) -> &mut [PoseState] {
        &mut self.particles
    }

    /// Normalized particle weights.
    #[inline]
    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// Reweight the ensemble from per-particle log-likelihoods.
    ///
    /// Weights become `w_i ∝ w_i · exp(ℓ_i − max ℓ)`; the max subtraction
    /// keeps the exponentiation in range. A weight sum that is zero or
    /// non-finite is a degenerate belief and is surfaced, not repaired.
    pub fn reweight_log(&mut self, log_likelihoods: &DVector<f64>) -> Result<(), TrackerError> {
        if self.size() == 0 {
            return Err(TrackerError::DegenerateBelief {
                description: "belief holds no particles".to_string(),
            });
        }
        if log_likelihoods.len() != self.size() {
            return Err(TrackerError::DimensionMismatch {
                expected: self.size(),
                actual: log_likelihoods.len(),
                context: "log-likelihood vector".to_string(),
            });
        }

        let max = log_likelihoods.max();
        for i in 0..self.size() {
            self.weights[i] *= (log_likelihoods[i] - max).exp();
        }
        self.normalize_weights()
    }

    /// Weighted linear mean of the particle states.
    ///
    /// Orientation components are axis-angle vectors averaged linearly;
    /// particles are re-centered every step, so all deltas stay near zero
    /// where the vector-space average is a faithful statistic.
    pub fn mean(&self) -> PoseState {
        debug_assert!(!self.particles.is_empty());
        let mut mean = DVector::zeros(self.particles[0].dimension());
        for (particle, &weight) in self.particles.iter().zip(self.weights.iter()) {
            mean += particle.as_vector() * weight;
        }
        PoseState::from_vector(mean).expect("mean inherits the particles' dimension")
    }

    /// Effective sample size `1 / Σ wᵢ²` of the current weights.
    pub fn effective_sample_size(&self) -> f64 {
        let sum_of_squares: f64 = self.weights.iter().map(|w| w * w).sum();
        if sum_of_squares > 0.0 {
            1.0 / sum_of_squares
        } else {
            0.0
        }
    }

    fn normalize_weights(&mut self) -> Result<(), TrackerError> {
        let sum: f64 = self.weights.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(TrackerError::DegenerateBelief {
                description: format!("particle weight sum is {}", sum),
            });
        }
        self.weights /= sum;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn particle(x: f64) -> PoseState {
        let mut state = PoseState::zeros(1);
        state.set_position(0, &Vector3::new(x, 0.0, 0.0));
        state
    }

    #[test]
    fn test_uniform_weights_after_set() {
        let mut belief = Belief::empty();
        belief.set_particles(vec![particle(0.0), particle(1.0), particle(2.0), particle(3.0)]);
        assert_eq!(belief.size(), 4);
        for &w in belief.weights().iter() {
            assert_relative_eq!(w, 0.25);
        }
    }

    #[test]
    fn test_mean_is_weighted() {
        let mut belief = Belief::empty();
        belief.set_particles(vec![particle(0.0), particle(2.0)]);
        let ll = DVector::from_vec(vec![0.0, 0.0]);
        belief.reweight_log(&ll).unwrap();
        assert_relative_eq!(belief.mean().position(0).x, 1.0);

        // Skew the weights entirely toward the second particle
        let ll = DVector::from_vec(vec![-1000.0, 0.0]);
        belief.reweight_log(&ll).unwrap();
        assert_relative_eq!(belief.mean().position(0).x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reweight_degenerate_surfaces() {
        let mut belief = Belief::empty();
        belief.set_particles(vec![particle(0.0), particle(1.0)]);
        let ll = DVector::from_vec(vec![f64::NAN, f64::NAN]);
        assert!(matches!(
            belief.reweight_log(&ll),
            Err(TrackerError::DegenerateBelief { .. })
        ));
    }

    #[test]
    fn test_reweight_dimension_mismatch() {
        let mut belief = Belief::empty();
        belief.set_particles(vec![particle(0.0)]);
        let ll = DVector::from_vec(vec![0.0, 0.0]);
        assert!(matches!(
            belief.reweight_log(&ll),
            Err(TrackerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_effective_sample_size() {
        let mut belief = Belief::empty();
        belief.set_particles(vec![particle(0.0), particle(1.0)]);
        assert_relative_eq!(belief.effective_sample_size(), 2.0);

        let ll = DVector::from_vec(vec![0.0, -1000.0]);
        belief.reweight_log(&ll).unwrap();
        assert_relative_eq!(belief.effective_sample_size(), 1.0, epsilon = 1e-9);
    }
}
