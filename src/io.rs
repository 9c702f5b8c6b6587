use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::PipelineConfig;
use crate::control::{LoopExit, LoopSummary};
use crate::error::PoseError;
use crate::pipeline::FrameReport;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: impl AsRef<Path>, object: &T) -> Result<()> {
    let output_path = output_path.as_ref();
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(output_path, j)
        .with_context(|| format!("cannot write {}", output_path.display()))?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let file_path = file_path.as_ref();
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("cannot read {}", file_path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Loads a pipeline config; missing fields take their defaults.
pub fn load_config(file_path: &str) -> Result<PipelineConfig, PoseError> {
    object_from_json::<PipelineConfig>(file_path).map_err(|e| PoseError::Config {
        path: file_path.to_string(),
        message: format!("{:#}", e),
    })
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub reference_path: String,
    pub video_path: String,
    pub min_inliers: usize,
    pub ransac_reproj_threshold: f64,
    pub exit: LoopExit,
    pub frames_read: usize,
    pub frames_shown: usize,
    pub frames_skipped: usize,
    pub posed_frames: usize,
    pub mean_focal: Option<f64>,
    pub frames: Vec<FrameReport>,
}

impl RunReport {
    pub fn new(config: &PipelineConfig, summary: &LoopSummary, frames: Vec<FrameReport>) -> RunReport {
        let timestamp = time::OffsetDateTime::now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
            .to_string();
        let focals: Vec<f64> = frames.iter().filter(|f| f.has_pose()).map(|f| f.focal).collect();
        let mean_focal = if focals.is_empty() {
            None
        } else {
            Some(focals.iter().sum::<f64>() / focals.len() as f64)
        };
        RunReport {
            timestamp,
            reference_path: config.reference_path.clone(),
            video_path: config.video_path.clone(),
            min_inliers: config.min_inliers,
            ransac_reproj_threshold: config.ransac_reproj_threshold,
            exit: summary.exit,
            frames_read: summary.frames_read,
            frames_shown: summary.frames_shown,
            frames_skipped: summary.frames_skipped(),
            posed_frames: focals.len(),
            mean_focal,
            frames,
        }
    }
}

pub fn write_run_report(output_path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    object_to_json(output_path, report)
}
