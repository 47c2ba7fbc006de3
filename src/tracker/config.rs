//! Tracker configuration.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::common::constants::{
    DEFAULT_ANGULAR_ACCELERATION_SIGMA, DEFAULT_DAMPING, DEFAULT_DELTA_TIME,
    DEFAULT_EVALUATION_COUNT, DEFAULT_LINEAR_ACCELERATION_SIGMA, DEFAULT_UPDATE_RATE,
};
use crate::filter::TrackerError;
use crate::state::PART_DOF;

/// Parameters of a tracking session.
///
/// Set once when the tracker is constructed; the transition model and the
/// moving-average blender read them from here for the tracker's lifetime.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Damping rate λ of the velocity process (mean-reversion speed).
    pub damping: f64,
    /// Standard deviation of the linear acceleration noise (m/s²).
    pub linear_acceleration_sigma: f64,
    /// Standard deviation of the angular acceleration noise (rad/s²).
    pub angular_acceleration_sigma: f64,
    /// Time step between tracking frames (s).
    pub delta_time: f64,
    /// Moving-average update rate in (0, 1].
    pub update_rate: f64,
    /// Likelihood-evaluation budget per step; the particle count is this
    /// divided by the number of object parts.
    pub evaluation_count: usize,
    /// Seed for the tracker's deterministic noise generator.
    pub seed: u64,
}

impl TrackerConfig {
    /// Create a config builder.
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }

    /// Acceleration covariance operator for one part: a diagonal built from
    /// the linear and angular sigmas, ordered `[linear(3) | angular(3)]` to
    /// match the pose half `[position | orientation]`.
    pub fn acceleration_covariance(&self) -> DMatrix<f64> {
        let linear = self.linear_acceleration_sigma * self.linear_acceleration_sigma;
        let angular = self.angular_acceleration_sigma * self.angular_acceleration_sigma;
        DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![
            linear, linear, linear, angular, angular, angular,
        ]))
    }

    /// Validate the configuration before any sampling happens.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(TrackerError::Configuration {
                description: format!("damping must be finite and non-negative, got {}", self.damping),
            });
        }
        if !(self.delta_time.is_finite() && self.delta_time > 0.0) {
            return Err(TrackerError::Configuration {
                description: format!("delta time must be positive, got {}", self.delta_time),
            });
        }
        if !(self.update_rate > 0.0 && self.update_rate <= 1.0) {
            return Err(TrackerError::Configuration {
                description: format!("update rate must be in (0, 1], got {}", self.update_rate),
            });
        }
        if self.evaluation_count == 0 {
            return Err(TrackerError::Configuration {
                description: "evaluation count must be positive".to_string(),
            });
        }
        if self.linear_acceleration_sigma < 0.0 || self.angular_acceleration_sigma < 0.0 {
            return Err(TrackerError::Configuration {
                description: "acceleration sigmas must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            linear_acceleration_sigma: DEFAULT_LINEAR_ACCELERATION_SIGMA,
            angular_acceleration_sigma: DEFAULT_ANGULAR_ACCELERATION_SIGMA,
            delta_time: DEFAULT_DELTA_TIME,
            update_rate: DEFAULT_UPDATE_RATE,
            evaluation_count: DEFAULT_EVALUATION_COUNT,
            seed: 0,
        }
    }
}

/// Builder for [`TrackerConfig`].
#[derive(Debug, Default)]
pub struct TrackerConfigBuilder {
    damping: Option<f64>,
    linear_acceleration_sigma: Option<f64>,
    angular_acceleration_sigma: Option<f64>,
    delta_time: Option<f64>,
    update_rate: Option<f64>,
    evaluation_count: Option<usize>,
    seed: Option<u64>,
}

impl TrackerConfigBuilder {
    /// Set the damping rate λ.
    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Set the linear acceleration noise sigma.
    pub fn linear_acceleration_sigma(mut self, sigma: f64) -> Self {
        self.linear_acceleration_sigma = Some(sigma);
        self
    }

    /// Set the angular acceleration noise sigma.
    pub fn angular_acceleration_sigma(mut self, sigma: f64) -> Self {
        self.angular_acceleration_sigma = Some(sigma);
        self
    }

    /// Set the frame time step.
    pub fn delta_time(mut self, delta_time: f64) -> Self {
        self.delta_time = Some(delta_time);
        self
    }

    /// Set the moving-average update rate.
    pub fn update_rate(mut self, update_rate: f64) -> Self {
        self.update_rate = Some(update_rate);
        self
    }

    /// Set the likelihood-evaluation budget.
    pub fn evaluation_count(mut self, count: usize) -> Self {
        self.evaluation_count = Some(count);
        self
    }

    /// Set the noise-generator seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> TrackerConfig {
        let defaults = TrackerConfig::default();
        TrackerConfig {
            damping: self.damping.unwrap_or(defaults.damping),
            linear_acceleration_sigma: self
                .linear_acceleration_sigma
                .unwrap_or(defaults.linear_acceleration_sigma),
            angular_acceleration_sigma: self
                .angular_acceleration_sigma
                .unwrap_or(defaults.angular_acceleration_sigma),
            delta_time: self.delta_time.unwrap_or(defaults.delta_time),
            update_rate: self.update_rate.unwrap_or(defaults.update_rate),
            evaluation_count: self.evaluation_count.unwrap_or(defaults.evaluation_count),
            seed: self.seed.unwrap_or(defaults.seed),
        }
    }
}

/// Snapshot of a tracker configuration for debugging and comparison runs.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerConfigSnapshot {
    /// Damping rate λ
    pub damping: f64,
    /// Linear acceleration sigma
    pub linear_acceleration_sigma: f64,
    /// Angular acceleration sigma
    pub angular_acceleration_sigma: f64,
    /// Frame time step
    pub delta_time: f64,
    /// Moving-average update rate
    pub update_rate: f64,
    /// Likelihood-evaluation budget
    pub evaluation_count: usize,
    /// Noise-generator seed
    pub seed: u64,
    /// Per-part degrees of freedom
    pub part_dof: usize,
    /// Acceleration covariance diagonal
    pub acceleration_covariance_diag: Vec<f64>,
}

impl From<&TrackerConfig> for TrackerConfigSnapshot {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            damping: config.damping,
            linear_acceleration_sigma: config.linear_acceleration_sigma,
            angular_acceleration_sigma: config.angular_acceleration_sigma,
            delta_time: config.delta_time,
            update_rate: config.update_rate,
            evaluation_count: config.evaluation_count,
            seed: config.seed,
            part_dof: PART_DOF,
            acceleration_covariance_diag: config
                .acceleration_covariance()
                .diagonal()
                .iter()
                .copied()
                .collect(),
        }
    }
}

impl TrackerConfigSnapshot {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Serialize to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TrackerConfig::builder()
            .damping(5.0)
            .delta_time(1.0 / 30.0)
            .update_rate(0.3)
            .evaluation_count(200)
            .seed(7)
            .build();

        assert_eq!(config.damping, 5.0);
        assert_eq!(config.update_rate, 0.3);
        assert_eq!(config.evaluation_count, 200);
        assert_eq!(config.seed, 7);
        // Unset fields fall back to defaults
        assert_eq!(
            config.linear_acceleration_sigma,
            TrackerConfig::default().linear_acceleration_sigma
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = TrackerConfig::default();
        config.update_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.update_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.evaluation_count = 0;
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.damping = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.delta_time = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_acceleration_covariance_layout() {
        let config = TrackerConfig::builder()
            .linear_acceleration_sigma(2.0)
            .angular_acceleration_sigma(3.0)
            .build();
        let covariance = config.acceleration_covariance();
        assert_eq!(covariance.nrows(), PART_DOF);
        assert_eq!(covariance[(0, 0)], 4.0);
        assert_eq!(covariance[(3, 3)], 9.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let config = TrackerConfig::default();
        let snapshot = TrackerConfigSnapshot::from(&config);
        let json = snapshot.to_json();
        assert!(json.contains("\"damping\""));
        assert!(json.contains("\"evaluation_count\""));
    }
}
