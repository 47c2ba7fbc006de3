//! Capability traits for the stochastic transition models.
//!
//! Instead of a deep distribution class hierarchy, the transition machinery
//! is described by two small capabilities that concrete models compose
//! through plain ownership:
//!
//! - [`StochasticMap`] - conditioning on a state/input pair plus a
//!   deterministic map from standard-normal noise to samples
//! - [`Moments`] - read access to the first two moments of a conditioned
//!   distribution

use nalgebra::{DMatrix, DVector};

/// A conditional distribution sampled by mapping standard-normal noise.
///
/// Implementations hold the conditioned distribution as internal state:
/// [`condition`](StochasticMap::condition) must be called before
/// [`map_standard_normal`](StochasticMap::map_standard_normal). A single
/// instance must not be shared between threads without external
/// synchronization; clone one instance per task instead.
pub trait StochasticMap {
    /// Condition the map on the current state and a control input.
    fn condition(&mut self, state: &DVector<f64>, input: &DVector<f64>);

    /// Map a standard-normal noise vector to a sample of the next state.
    ///
    /// The noise vector is only read, never consumed or mutated, so callers
    /// may feed the same draw to several coupled samplers.
    fn map_standard_normal(&self, noise: &DVector<f64>) -> DVector<f64>;

    /// Dimension of the noise vector this map consumes.
    fn noise_dimension(&self) -> usize;
}

/// First and second moments of a distribution.
pub trait Moments {
    /// Mean vector.
    fn mean(&self) -> &DVector<f64>;

    /// Covariance matrix.
    fn covariance(&self) -> &DMatrix<f64>;
}
