// src/lib.rs
//
// Moving-obstacle extraction from scrolling, robot-centric occupancy
// grids. A dual-rate background model (fast and slow exponential
// estimates) is realigned to the robot's translating window each step,
// updated with temporal and spatial smoothing, and reduced to a binary
// foreground mask through three cell-wise gates plus morphological
// cleanup. The mask marks cells that likely contain a moving obstacle,
// ready for downstream costmap conversion.

mod config;
pub mod grid;
pub mod history;
pub mod morphology;
pub mod scenario;
pub mod subtractor;
pub mod types;

pub use subtractor::{BackgroundSubtractor, SubtractorError, SubtractorParams};
pub use types::Config;
