use log::info;
use opencv::core::Mat;
use opencv::imgcodecs;
use opencv::prelude::*;

use super::features::{FeatureSet, OrbDetector};
use crate::error::PoseError;

/// The still image of the planar target and its features. Built once
/// before the frame loop and only read afterwards.
pub struct ReferenceModel {
    image: Mat,
    features: FeatureSet,
}

impl ReferenceModel {
    pub fn load(path: &str, detector: &mut OrbDetector) -> Result<Self, PoseError> {
        let image = imgcodecs::imread(path, imgcodecs::IMREAD_COLOR)?;
        if image.empty() {
            return Err(PoseError::ReferenceUnreadable(path.to_string()));
        }
        let features = detector.detect(&image)?;
        if features.is_empty() {
            return Err(PoseError::ReferenceFeatureless(path.to_string()));
        }
        info!(
            "reference {} ({}x{}): {} keypoints",
            path,
            image.cols(),
            image.rows(),
            features.keypoints.len()
        );
        Ok(Self { image, features })
    }

    pub fn image(&self) -> &Mat {
        &self.image
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }
}
