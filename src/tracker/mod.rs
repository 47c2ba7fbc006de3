//! Tracking loop: configuration, output smoothing and the RBPF tracker.

pub mod config;
pub mod rbpf;
pub mod smoothing;

pub use config::{TrackerConfig, TrackerConfigBuilder, TrackerConfigSnapshot};
pub use rbpf::RbpfTracker;
pub use smoothing::move_average;
