#![allow(dead_code)]

use planar_pose_calibration::camera_model::{Pinhole, project_with_pose};
use planar_pose_calibration::detected_points::{FeaturePoint, FrameFeature};
use planar_pose_calibration::optimization::SingleViewCalibration;
use planar_pose_calibration::types::RvecTvec;

pub const FOCAL: f64 = 800.0;
pub const IMG_W_H: (u32, u32) = (640, 480);

pub fn ground_truth_pose() -> RvecTvec {
    RvecTvec::new(&[0.3, -0.2, 0.05], &[-100.0, -125.0, 600.0])
}

pub fn ground_truth_camera() -> Pinhole<f64> {
    Pinhole::centered(FOCAL, IMG_W_H.0, IMG_W_H.1)
}

pub fn ground_truth_calibration() -> SingleViewCalibration {
    SingleViewCalibration {
        camera: ground_truth_camera(),
        pose: ground_truth_pose(),
        rms: 0.0,
    }
}

/// Reference-plane points on a 10 px grid covering 200 x 250 px.
pub fn plane_grid() -> Vec<glam::Vec3> {
    let mut pts = Vec::new();
    for y in (0..=250).step_by(10) {
        for x in (0..=200).step_by(10) {
            pts.push(glam::Vec3::new(x as f32, y as f32, 0.0));
        }
    }
    pts
}

/// Noise-free correspondences of `plane_grid` seen through `pose`.
pub fn features_with_pose(pose: &RvecTvec) -> Vec<FeaturePoint> {
    let grid = plane_grid();
    let projected = project_with_pose(&ground_truth_camera(), &pose.to_na_isometry3(), &grid);
    grid.iter()
        .zip(projected)
        .map(|(p3d, p2d)| {
            let p2d = p2d.expect("grid point behind the camera");
            FeaturePoint {
                p2d: glam::Vec2::new(p2d.x as f32, p2d.y as f32),
                p3d: *p3d,
            }
        })
        .collect()
}

pub fn synthetic_features() -> Vec<FeaturePoint> {
    features_with_pose(&ground_truth_pose())
}

pub fn synthetic_frame(frame_idx: usize) -> FrameFeature {
    FrameFeature {
        frame_idx,
        img_w_h: IMG_W_H,
        features: synthetic_features().into_iter().enumerate().collect(),
    }
}
