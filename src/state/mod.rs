//! Multi-part state representation and coordinate-frame transforms.

pub mod coordinates;
pub mod pose;

pub use coordinates::{to_center_coordinates, to_model_coordinates};
pub use pose::{PoseState, PART_DIM, PART_DOF};
