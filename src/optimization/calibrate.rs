use std::collections::HashMap;

use log::{debug, trace};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use tiny_solver::Optimizer;

use super::factors::FocalReprojectionFactor;
use super::homography::{dlt_homography, planar_homography_to_focal};
use super::linear::init_pose;
use crate::camera_model::{Pinhole, image_center, project_with_pose};
use crate::detected_points::FeaturePoint;
use crate::types::RvecTvec;

pub const MIN_CALIBRATION_POINTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub max_iteration: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { max_iteration: 50 }
    }
}

/// Result of calibrating from one view of the reference plane.
#[derive(Debug, Clone)]
pub struct SingleViewCalibration {
    pub camera: Pinhole<f64>,
    pub pose: RvecTvec,
    pub rms: f64,
}

impl SingleViewCalibration {
    pub fn focal(&self) -> f64 {
        self.camera.f
    }

    /// Projects reference-plane points (and points off the plane) into the
    /// frame. Points behind the camera give `None`.
    pub fn project(&self, points: &[glam::Vec3]) -> Vec<Option<na::Vector2<f64>>> {
        project_with_pose(&self.camera, &self.pose.to_na_isometry3(), points)
    }
}

/// Initial focal length: closed form from the plane homography, or the
/// larger image side when the view is degenerate.
pub fn init_focal(features: &[FeaturePoint], img_w_h: (u32, u32)) -> f64 {
    let cxcy = image_center(img_w_h.0, img_w_h.1);
    let (plane, image): (Vec<_>, Vec<_>) = features
        .iter()
        .map(|f| {
            (
                na::Vector2::new(f.p3d.x as f64, f.p3d.y as f64),
                na::Vector2::new(f.p2d.x as f64, f.p2d.y as f64),
            )
        })
        .unzip();
    dlt_homography(&plane, &image)
        .and_then(|h| planar_homography_to_focal(&h, cxcy))
        .unwrap_or_else(|| {
            debug!("focal init fell back to the image size");
            img_w_h.0.max(img_w_h.1) as f64
        })
}

/// Root mean square pixel reprojection error.
pub fn reprojection_rms(
    camera: &Pinhole<f64>,
    pose: &RvecTvec,
    features: &[FeaturePoint],
) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let p3ds: Vec<_> = features.iter().map(|f| f.p3d).collect();
    let projected = project_with_pose(camera, &pose.to_na_isometry3(), &p3ds);
    let sum_sq: f64 = projected
        .iter()
        .zip(features)
        .map(|(p, f)| match p {
            Some(p) => (p - na::Vector2::new(f.p2d.x as f64, f.p2d.y as f64)).norm_squared(),
            None => f64::INFINITY,
        })
        .sum();
    (sum_sq / features.len() as f64).sqrt()
}

/// Calibrates focal length and pose from the correspondences of a single
/// frame. Aspect ratio, principal point and distortion stay fixed.
pub fn calibrate_single_view(
    features: &[FeaturePoint],
    img_w_h: (u32, u32),
    config: &CalibrationConfig,
) -> Option<SingleViewCalibration> {
    if features.len() < MIN_CALIBRATION_POINTS {
        debug!("{} points are too few to calibrate", features.len());
        return None;
    }
    let cxcy = image_center(img_w_h.0, img_w_h.1);
    let focal_init = init_focal(features, img_w_h);
    let pose_init = init_pose(features, focal_init, cxcy)?;
    trace!("init focal {:.2}, pose {:?}", focal_init, pose_init);

    let mut problem = tiny_solver::Problem::new();
    for f in features {
        let cost = FocalReprojectionFactor::new(&f.p3d, &f.p2d, cxcy, img_w_h);
        problem.add_residual_block(2, &["f", "rvec", "tvec"], Box::new(cost), None);
    }

    let initial_values = HashMap::<String, na::DVector<f64>>::from([
        ("f".to_string(), na::dvector![focal_init]),
        (
            "rvec".to_string(),
            na::DVector::from_column_slice(pose_init.na_rvec().as_slice()),
        ),
        (
            "tvec".to_string(),
            na::DVector::from_column_slice(pose_init.na_tvec().as_slice()),
        ),
    ]);

    let optimizer = tiny_solver::LevenbergMarquardtOptimizer::default();
    let options = tiny_solver::OptimizerOptions {
        max_iteration: config.max_iteration.clamp(1, 500),
        verbosity_level: 0,
        ..Default::default()
    };
    let result = optimizer.optimize(&problem, &initial_values, Some(options))?;

    let focal = result.get("f")?[0];
    let rvec = result.get("rvec")?;
    let tvec = result.get("tvec")?;
    let pose = RvecTvec::new(rvec.as_slice(), tvec.as_slice());
    if !focal.is_finite() || focal <= 0.0 || !pose.is_finite() {
        debug!("calibration diverged, f = {}", focal);
        return None;
    }

    let camera = Pinhole::centered(focal, img_w_h.0, img_w_h.1);
    let rms = reprojection_rms(&camera, &pose, features);
    trace!("calibrated f {:.2}, rms {:.4} px", camera.f, rms);
    Some(SingleViewCalibration { camera, pose, rms })
}
