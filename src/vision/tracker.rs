use anyhow::Result;
use log::{debug, trace};
use opencv::core::Mat;
use opencv::prelude::*;

use super::features::{FeatureMatcher, OrbDetector};
use super::geometric::{correspondences, find_inliers};
use super::overlay::{draw_box, draw_caption, draw_inlier_matches};
use super::reference::ReferenceModel;
use crate::box_model::ArBox;
use crate::config::PipelineConfig;
use crate::error::PoseError;
use crate::pipeline::{FrameOutcome, FrameReport, gate_features, gate_matches};

/// Per-frame pose pipeline against a fixed reference image.
pub struct PoseTracker {
    detector: OrbDetector,
    reference: ReferenceModel,
    matcher: FeatureMatcher,
    ar_box: ArBox,
    config: PipelineConfig,
}

impl PoseTracker {
    /// Loads the reference and prepares the matcher. Fails before any frame
    /// is read if the reference is unusable.
    pub fn new(config: &PipelineConfig) -> Result<Self, PoseError> {
        let mut detector = OrbDetector::new(&config.orb)?;
        let reference = ReferenceModel::load(&config.reference_path, &mut detector)?;
        let matcher = FeatureMatcher::new(reference.features())?;
        Ok(Self {
            detector,
            reference,
            matcher,
            ar_box: ArBox::from_config(&config.ar_box),
            config: config.clone(),
        })
    }

    pub fn ar_box(&self) -> &ArBox {
        &self.ar_box
    }

    pub fn process(&mut self, frame_idx: usize, frame: &Mat) -> Result<FrameOutcome<Mat>> {
        let frame_features = self.detector.detect(frame)?;
        if let Err(reason) = gate_features(
            frame_features.keypoints.len(),
            frame_features.descriptors.empty(),
        ) {
            debug!("frame {} skipped: {}", frame_idx, reason);
            return Ok(FrameOutcome::Skipped(reason));
        }

        let matches = self.matcher.match_features(&frame_features)?;
        if let Err(reason) = gate_matches(matches.len(), self.config.min_inliers) {
            debug!("frame {} skipped: {}", frame_idx, reason);
            return Ok(FrameOutcome::Skipped(reason));
        }

        let img_w_h = (frame.cols() as u32, frame.rows() as u32);
        let frame_feature = correspondences(
            frame_idx,
            img_w_h,
            &matches,
            self.reference.features(),
            &frame_features,
        )?;
        let mask = find_inliers(&frame_feature, self.config.ransac_reproj_threshold)?;
        let report = FrameReport::evaluate(
            &frame_feature,
            &mask,
            self.config.min_inliers,
            &self.ar_box,
            &self.config.calibration,
        );
        trace!(
            "frame {}: {} matches, {} inliers, focal {:.1}",
            frame_idx, report.match_num, report.inlier_num, report.focal
        );

        let mut image = draw_inlier_matches(
            frame,
            &frame_features,
            self.reference.image(),
            self.reference.features(),
            &matches,
            &mask,
        )?;
        if let Some(projection) = &report.box_projection {
            draw_box(&mut image, projection)?;
        }
        draw_caption(&mut image, &report.caption())?;
        Ok(FrameOutcome::Rendered { image, report })
    }
}
