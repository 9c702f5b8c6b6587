use serde::{Deserialize, Serialize};

use crate::box_model::BoxConfig;
use crate::optimization::CalibrationConfig;

pub const DEFAULT_REFERENCE_PATH: &str = "../data/blais.jpg";
pub const DEFAULT_VIDEO_PATH: &str = "../data/blais.mp4";
pub const DEFAULT_WINDOW_TITLE: &str = "Pose Estimation (Book)";
pub const MIN_INLIER_NUM: usize = 100;

/// ORB detector settings; the defaults are OpenCV's `ORB::create()` ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub n_features: i32,
    pub scale_factor: f32,
    pub n_levels: i32,
    pub edge_threshold: i32,
    pub first_level: i32,
    pub wta_k: i32,
    pub patch_size: i32,
    pub fast_threshold: i32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 8,
            edge_threshold: 31,
            first_level: 0,
            wta_k: 2,
            patch_size: 31,
            fast_threshold: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reference_path: String,
    pub video_path: String,
    pub window_title: String,
    /// Fewer matches skip the frame; the pose needs strictly more inliers.
    pub min_inliers: usize,
    pub ransac_reproj_threshold: f64,
    /// Key-wait between frames; 0 would block on every frame.
    pub key_wait_ms: i32,
    pub orb: OrbConfig,
    pub ar_box: BoxConfig,
    pub calibration: CalibrationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_path: DEFAULT_REFERENCE_PATH.to_string(),
            video_path: DEFAULT_VIDEO_PATH.to_string(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            min_inliers: MIN_INLIER_NUM,
            ransac_reproj_threshold: 2.0,
            key_wait_ms: 1,
            orb: OrbConfig::default(),
            ar_box: BoxConfig::default(),
            calibration: CalibrationConfig::default(),
        }
    }
}
