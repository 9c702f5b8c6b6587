use super::generic::CameraModel;
use nalgebra as na;

/// Pinhole camera with square pixels and no distortion.
#[derive(Debug, Clone, PartialEq)]
pub struct Pinhole<T: na::RealField + Clone> {
    pub f: T,
    pub cx: T,
    pub cy: T,
    pub width: u32,
    pub height: u32,
}

impl<T: na::RealField + Clone> Pinhole<T> {
    pub fn new(f: T, cx: T, cy: T, width: u32, height: u32) -> Pinhole<T> {
        Pinhole {
            f,
            cx,
            cy,
            width,
            height,
        }
    }

    /// Principal point at the pixel centre of the image, matching OpenCV's
    /// default when it is held fixed.
    pub fn centered(f: T, width: u32, height: u32) -> Pinhole<T> {
        let (cx, cy) = image_center(width, height);
        Pinhole::new(f, na::convert(cx), na::convert(cy), width, height)
    }

    pub fn camera_matrix(&self) -> na::Matrix3<T> {
        let zero = T::zero();
        let one = T::one();
        na::Matrix3::new(
            self.f.clone(),
            zero.clone(),
            self.cx.clone(),
            zero.clone(),
            self.f.clone(),
            self.cy.clone(),
            zero.clone(),
            zero,
            one,
        )
    }
}

pub fn image_center(width: u32, height: u32) -> (f64, f64) {
    ((width as f64 - 1.0) / 2.0, (height as f64 - 1.0) / 2.0)
}

impl<T: na::RealField + Clone> CameraModel<T> for Pinhole<T> {
    fn params(&self) -> na::DVector<T> {
        na::dvector![self.f.clone(), self.cx.clone(), self.cy.clone()]
    }

    fn width(&self) -> T {
        na::convert(self.width as f64)
    }

    fn height(&self) -> T {
        na::convert(self.height as f64)
    }

    fn project_one(&self, pt: &na::Vector3<T>) -> na::Vector2<T> {
        let xn = pt[0].clone() / pt[2].clone();
        let yn = pt[1].clone() / pt[2].clone();
        na::Vector2::new(
            self.f.clone() * xn + self.cx.clone(),
            self.f.clone() * yn + self.cy.clone(),
        )
    }
}
