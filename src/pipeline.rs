//! Per-frame guarded pipeline.
//!
//! Every stage either hands a value to the next one or stops the frame with
//! a [`SkipReason`]. Only skips that happen before the geometric filter hide
//! the frame; a frame without enough inliers is still shown, just without a
//! box and with a focal length of 0.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::box_model::{ArBox, BoxProjection};
use crate::detected_points::{FeaturePoint, FrameFeature};
use crate::optimization::{CalibrationConfig, SingleViewCalibration, calibrate_single_view};
use crate::types::RvecTvec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    NoFrameFeatures,
    TooFewMatches { found: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFrameFeatures => write!(f, "no features in frame"),
            SkipReason::TooFewMatches { found, required } => {
                write!(f, "{} matches, need {}", found, required)
            }
        }
    }
}

/// Outcome of one frame: skipped, or rendered into an image of type `I`.
#[derive(Debug)]
pub enum FrameOutcome<I> {
    Skipped(SkipReason),
    Rendered { image: I, report: FrameReport },
}

pub fn gate_features(keypoint_num: usize, descriptors_empty: bool) -> Result<(), SkipReason> {
    if keypoint_num == 0 || descriptors_empty {
        Err(SkipReason::NoFrameFeatures)
    } else {
        Ok(())
    }
}

pub fn gate_matches(match_num: usize, min_inliers: usize) -> Result<(), SkipReason> {
    if match_num < min_inliers {
        Err(SkipReason::TooFewMatches {
            found: match_num,
            required: min_inliers,
        })
    } else {
        Ok(())
    }
}

/// The pose is only estimated with strictly more inliers than the minimum.
pub fn pose_gate(inlier_num: usize, min_inliers: usize) -> bool {
    inlier_num > min_inliers
}

pub fn inlier_percentage(inlier_num: usize, match_num: usize) -> usize {
    if match_num == 0 {
        0
    } else {
        100 * inlier_num / match_num
    }
}

pub fn caption(inlier_num: usize, match_num: usize, focal: f64) -> String {
    format!(
        "Inliers: {} ({}%), Focal Length: {:.0}",
        inlier_num,
        inlier_percentage(inlier_num, match_num),
        focal
    )
}

/// Per-match inlier flags, aligned with the match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlierMask {
    flags: Vec<bool>,
}

impl InlierMask {
    pub fn new(flags: Vec<bool>) -> InlierMask {
        InlierMask { flags }
    }

    /// Mask for a failed estimate: every match is an outlier.
    pub fn none(len: usize) -> InlierMask {
        InlierMask {
            flags: vec![false; len],
        }
    }

    /// Builds a mask from the raw bytes of a backend mask; a length mismatch
    /// counts as a failed estimate.
    pub fn from_bytes(bytes: &[u8], expected_len: usize) -> InlierMask {
        if bytes.len() != expected_len {
            debug!(
                "inlier mask has {} entries for {} matches",
                bytes.len(),
                expected_len
            );
            return InlierMask::none(expected_len);
        }
        InlierMask {
            flags: bytes.iter().map(|b| *b != 0).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Mask in the `char` layout the match drawing expects.
    pub fn to_char_mask(&self) -> Vec<i8> {
        self.flags.iter().map(|f| *f as i8).collect()
    }

    pub fn select<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .zip(&self.flags)
            .filter_map(|(item, keep)| keep.then_some(item))
            .collect()
    }
}

/// Everything the overlay and the run report need to know about a frame
/// that made it past the match gate.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame_idx: usize,
    pub match_num: usize,
    pub inlier_num: usize,
    pub inlier_percent: usize,
    /// 0 when no pose was estimated.
    pub focal: f64,
    pub pose: Option<RvecTvec>,
    pub rms: Option<f64>,
    #[serde(skip)]
    pub box_projection: Option<BoxProjection>,
    /// Inlier frame points keyed by reference keypoint index.
    #[serde(skip)]
    pub inliers: Vec<(usize, glam::Vec2)>,
}

impl FrameReport {
    /// Runs the pose stage on the matched correspondences of a frame.
    pub fn evaluate(
        frame: &FrameFeature,
        mask: &InlierMask,
        min_inliers: usize,
        ar_box: &ArBox,
        calibration_config: &CalibrationConfig,
    ) -> FrameReport {
        let match_num = frame.len();
        let inliers: Vec<&(usize, FeaturePoint)> = mask.select(&frame.features);
        let inlier_num = inliers.len();

        let calibration = if pose_gate(inlier_num, min_inliers) {
            let points: Vec<FeaturePoint> = inliers.iter().map(|(_, p)| *p).collect();
            calibrate_single_view(&points, frame.img_w_h, calibration_config)
        } else {
            debug!(
                "frame {}: {} inliers, need more than {}",
                frame.frame_idx, inlier_num, min_inliers
            );
            None
        };
        let box_projection = calibration.as_ref().and_then(|c| ar_box.project(c));

        FrameReport {
            frame_idx: frame.frame_idx,
            match_num,
            inlier_num,
            inlier_percent: inlier_percentage(inlier_num, match_num),
            focal: calibration.as_ref().map_or(0.0, SingleViewCalibration::focal),
            pose: calibration.as_ref().map(|c| c.pose),
            rms: calibration.as_ref().map(|c| c.rms),
            box_projection,
            inliers: inliers.iter().map(|(id, p)| (*id, p.p2d)).collect(),
        }
    }

    pub fn has_pose(&self) -> bool {
        self.pose.is_some()
    }

    pub fn caption(&self) -> String {
        caption(self.inlier_num, self.match_num, self.focal)
    }
}
