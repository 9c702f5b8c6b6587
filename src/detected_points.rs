/// One reference-to-frame correspondence. `p3d` lies on the reference
/// plane (z = 0, reference image pixels), `p2d` is the frame pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturePoint {
    pub p2d: glam::Vec2,
    pub p3d: glam::Vec3,
}

impl FeaturePoint {
    pub fn from_reference(reference_xy: glam::Vec2, frame_xy: glam::Vec2) -> FeaturePoint {
        FeaturePoint {
            p2d: frame_xy,
            p3d: reference_xy.extend(0.0),
        }
    }
    pub fn reference_xy(&self) -> glam::Vec2 {
        self.p3d.truncate()
    }
}

/// Correspondences of a single frame in match order, keyed by the index of
/// the reference keypoint they were matched to.
#[derive(Debug, Clone)]
pub struct FrameFeature {
    pub frame_idx: usize,
    pub img_w_h: (u32, u32),
    pub features: Vec<(usize, FeaturePoint)>,
}

impl FrameFeature {
    pub fn len(&self) -> usize {
        self.features.len()
    }
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
