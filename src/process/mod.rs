//! Stochastic state-transition models.
//!
//! The tracker propagates pose/velocity hypotheses between frames with an
//! integrated damped Wiener process: an Ornstein-Uhlenbeck-like velocity
//! process integrated once to yield a joint position+velocity Gaussian
//! transition with closed-form moments.
//!
//! # Types
//!
//! - [`Gaussian`] - runtime-dimension Gaussian with cached covariance root
//! - [`DampedWienerProcess`] - velocity transition with mean reversion
//! - [`IntegratedDampedWienerProcess`] - joint position+velocity transition
//!
//! # Capabilities
//!
//! - [`StochasticMap`] - condition + standard-normal sample mapping
//! - [`Moments`] - mean/covariance access

pub mod damped_wiener;
pub mod gaussian;
pub mod integrated_wiener;
pub mod traits;

pub use damped_wiener::DampedWienerProcess;
pub use gaussian::Gaussian;
pub use integrated_wiener::IntegratedDampedWienerProcess;
pub use traits::{Moments, StochasticMap};
