//! Error types for the tracker and its filtering primitives.
//!
//! Structural misconfiguration is detected before any sampling happens and
//! is fatal to the affected tracker instance. Numerical near-singularities
//! inside the transition model are *not* errors: they are recovered locally
//! through the documented Taylor-limit substitutions and never surface here.

use std::fmt;

/// Errors that can occur while constructing or running a tracker
#[derive(Debug, Clone)]
pub enum TrackerError {
    /// Structural misconfiguration (odd state dimension, empty object
    /// model, zero particle budget, out-of-range update rate)
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "state dimension", "input dimension")
        context: String,
    },

    /// Particle weights collapsed to zero or non-finite values during a
    /// propagation pass
    DegenerateBelief {
        /// Description of the degeneracy
        description: String,
    },

    /// `track` was called before `initialize`
    NotInitialized,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            TrackerError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            TrackerError::DegenerateBelief { description } => {
                write!(f, "Degenerate belief: {}", description)
            }
            TrackerError::NotInitialized => {
                write!(f, "Tracker was not initialized before tracking")
            }
        }
    }
}

impl std::error::Error for TrackerError {}
