//! Numerical constants used by the transition model and the tracker.
//!
//! These are intentionally separate from the user-configurable
//! [`TrackerConfig`](crate::tracker::TrackerConfig) parameters: they are
//! properties of the closed-form equations, not tuning knobs.

/// Euler–Mascheroni constant γ.
///
/// Appears in the closed-form position covariance of the integrated damped
/// Wiener process, where the exact solution contains the term
/// `γ + Γ(0, x) + ln(x)`.
pub const EULER_MASCHERONI: f64 = 0.57721566490153286060651209008240243104215933593992;

/// First argument handed to the upper incomplete gamma function.
///
/// The covariance formula wants `Γ(0, x)`, which is finite for `x > 0`, but
/// incomplete-gamma implementations reject a first argument of exactly zero.
/// A tiny positive value is indistinguishable from the limit for any
/// realistic time step.
pub const INCOMPLETE_GAMMA_EPSILON: f64 = 1e-11;

/// Default time step between tracking frames (30 Hz depth camera).
pub const DEFAULT_DELTA_TIME: f64 = 1.0 / 30.0;

/// Default damping rate of the velocity process.
pub const DEFAULT_DAMPING: f64 = 1.0;

/// Default moving-average update rate for the reported pose.
pub const DEFAULT_UPDATE_RATE: f64 = 0.1;

/// Default likelihood-evaluation budget per tracking step.
///
/// The particle count is this budget divided by the number of object parts,
/// since every part of every particle costs one likelihood evaluation.
pub const DEFAULT_EVALUATION_COUNT: usize = 100;

/// Default standard deviation of the linear acceleration noise (m/s²).
pub const DEFAULT_LINEAR_ACCELERATION_SIGMA: f64 = 0.02;

/// Default standard deviation of the angular acceleration noise (rad/s²).
pub const DEFAULT_ANGULAR_ACCELERATION_SIGMA: f64 = 0.1;
