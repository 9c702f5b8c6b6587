use nalgebra as na;
use tiny_solver::factors::Factor;

use crate::camera_model::{CameraModel, Pinhole};

/// Pixel reprojection residual of one plane point with only the focal
/// length free; the principal point is held fixed.
///
/// params: `[[f], rvec, tvec]`
#[derive(Debug, Clone)]
pub struct FocalReprojectionFactor {
    pub p3d: na::Point3<f64>,
    pub p2d: na::Vector2<f64>,
    pub cxcy: (f64, f64),
    pub img_w_h: (u32, u32),
}

impl FocalReprojectionFactor {
    pub fn new(
        p3d: &glam::Vec3,
        p2d: &glam::Vec2,
        cxcy: (f64, f64),
        img_w_h: (u32, u32),
    ) -> FocalReprojectionFactor {
        FocalReprojectionFactor {
            p3d: na::Point3::new(p3d.x as f64, p3d.y as f64, p3d.z as f64),
            p2d: na::Vector2::new(p2d.x as f64, p2d.y as f64),
            cxcy,
            img_w_h,
        }
    }
}

impl<T: na::RealField> Factor<T> for FocalReprojectionFactor {
    fn residual_func(&self, params: &[na::DVector<T>]) -> na::DVector<T> {
        let model = Pinhole::new(
            params[0][0].clone(),
            na::convert(self.cxcy.0),
            na::convert(self.cxcy.1),
            self.img_w_h.0,
            self.img_w_h.1,
        );
        let rvec = na::Vector3::new(
            params[1][0].clone(),
            params[1][1].clone(),
            params[1][2].clone(),
        );
        let tvec = na::Vector3::new(
            params[2][0].clone(),
            params[2][1].clone(),
            params[2][2].clone(),
        );
        let transform = na::Isometry3::new(tvec, rvec);
        let p3d: na::Point3<T> = na::Point3::new(
            na::convert(self.p3d.x),
            na::convert(self.p3d.y),
            na::convert(self.p3d.z),
        );
        let p3d_t = (transform * p3d).coords;
        let p2d_p = model.project_one(&p3d_t);

        na::dvector![
            p2d_p[0].clone() - na::convert::<f64, T>(self.p2d.x),
            p2d_p[1].clone() - na::convert::<f64, T>(self.p2d.y)
        ]
    }
}
