pub mod box_model;
pub mod camera_model;
pub mod config;
pub mod control;
pub mod detected_points;
pub mod error;
pub mod io;
pub mod optimization;
pub mod pipeline;
pub mod types;

#[cfg(feature = "opencv")]
pub mod vision;

#[cfg(feature = "visualization")]
pub mod visualization;
