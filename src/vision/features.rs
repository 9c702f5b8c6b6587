use opencv::core::{DMatch, KeyPoint, Mat, Ptr, Vector};
use opencv::features2d::{self, BFMatcher};
use opencv::prelude::*;

use crate::config::OrbConfig;

/// ORB keypoints with their descriptors, one descriptor row per keypoint.
#[derive(Clone)]
pub struct FeatureSet {
    pub keypoints: Vector<KeyPoint>,
    pub descriptors: Mat,
}

impl FeatureSet {
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty() || self.descriptors.empty()
    }

    /// Pixel location of a keypoint.
    pub fn point(&self, idx: usize) -> opencv::Result<glam::Vec2> {
        let pt = self.keypoints.get(idx)?.pt();
        Ok(glam::Vec2::new(pt.x, pt.y))
    }
}

pub struct OrbDetector {
    orb: Ptr<features2d::ORB>,
}

impl OrbDetector {
    pub fn new(config: &OrbConfig) -> opencv::Result<Self> {
        let orb = features2d::ORB::create(
            config.n_features,
            config.scale_factor,
            config.n_levels,
            config.edge_threshold,
            config.first_level,
            config.wta_k,
            features2d::ORB_ScoreType::HARRIS_SCORE,
            config.patch_size,
            config.fast_threshold,
        )?;
        Ok(Self { orb })
    }

    pub fn detect(&mut self, image: &Mat) -> opencv::Result<FeatureSet> {
        let mut keypoints = Vector::<KeyPoint>::new();
        let mut descriptors = Mat::default();
        let mask = Mat::default();
        self.orb
            .detect_and_compute(image, &mask, &mut keypoints, &mut descriptors, false)?;
        Ok(FeatureSet {
            keypoints,
            descriptors,
        })
    }
}

/// Brute-force Hamming matcher with the reference descriptors as its
/// fixed train set.
pub struct FeatureMatcher {
    matcher: BFMatcher,
    train: Mat,
}

impl FeatureMatcher {
    pub fn new(train: &FeatureSet) -> opencv::Result<Self> {
        // no cross-check: every query descriptor gets its best match
        let matcher = BFMatcher::new(opencv::core::NORM_HAMMING, false)?;
        Ok(Self {
            matcher,
            train: train.descriptors.clone(),
        })
    }

    pub fn match_features(&self, query: &FeatureSet) -> opencv::Result<Vector<DMatch>> {
        let mut matches = Vector::<DMatch>::new();
        self.matcher
            .train_match(&query.descriptors, &self.train, &mut matches, &Mat::default())?;
        Ok(matches)
    }
}
