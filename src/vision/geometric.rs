use opencv::calib3d;
use opencv::core::{DMatch, Mat, Point2f, Vector};
use opencv::prelude::*;

use super::features::FeatureSet;
use crate::detected_points::{FeaturePoint, FrameFeature};
use crate::pipeline::InlierMask;

/// Turns matches into correspondences, in match order.
pub fn correspondences(
    frame_idx: usize,
    img_w_h: (u32, u32),
    matches: &Vector<DMatch>,
    reference: &FeatureSet,
    frame: &FeatureSet,
) -> opencv::Result<FrameFeature> {
    let features = matches
        .iter()
        .map(|m| {
            let reference_idx = m.train_idx as usize;
            let reference_xy = reference.point(reference_idx)?;
            let frame_xy = frame.point(m.query_idx as usize)?;
            Ok((reference_idx, FeaturePoint::from_reference(reference_xy, frame_xy)))
        })
        .collect::<opencv::Result<Vec<_>>>()?;
    Ok(FrameFeature {
        frame_idx,
        img_w_h,
        features,
    })
}

/// RANSAC homography from frame points to reference points; only the
/// inlier mask is kept.
pub fn find_inliers(frame: &FrameFeature, reproj_threshold: f64) -> opencv::Result<InlierMask> {
    let n = frame.len();
    if n < 4 {
        return Ok(InlierMask::none(n));
    }
    let (img_points, obj_project): (Vec<Point2f>, Vec<Point2f>) = frame
        .features
        .iter()
        .map(|(_, p)| {
            let r = p.reference_xy();
            (Point2f::new(p.p2d.x, p.p2d.y), Point2f::new(r.x, r.y))
        })
        .unzip();
    let img_points = Vector::from_iter(img_points);
    let obj_project = Vector::from_iter(obj_project);

    let mut mask = Mat::default();
    let homography = calib3d::find_homography(
        &img_points,
        &obj_project,
        &mut mask,
        calib3d::RANSAC,
        reproj_threshold,
    )?;
    if homography.empty() || mask.empty() {
        return Ok(InlierMask::none(n));
    }
    let bytes = mask.data_bytes()?;
    Ok(InlierMask::from_bytes(bytes, n))
}
