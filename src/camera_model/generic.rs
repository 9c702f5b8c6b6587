use nalgebra as na;

pub trait CameraModel<T: na::RealField + Clone> {
    fn params(&self) -> na::DVector<T>;
    fn width(&self) -> T;
    fn height(&self) -> T;
    fn project_one(&self, pt: &na::Vector3<T>) -> na::Vector2<T>;

    /// Projects camera-frame points. Points on or behind the image plane
    /// give `None`; points outside the image bounds are kept.
    fn project(&self, p3d: &[na::Vector3<T>]) -> Vec<Option<na::Vector2<T>>> {
        p3d.iter()
            .map(|pt| {
                if pt[2] <= T::zero() {
                    None
                } else {
                    Some(self.project_one(pt))
                }
            })
            .collect()
    }
}

/// Projects reference-frame points through a pose and a camera model.
pub fn project_with_pose<M: CameraModel<f64>>(
    model: &M,
    pose: &na::Isometry3<f64>,
    points: &[glam::Vec3],
) -> Vec<Option<na::Vector2<f64>>> {
    let p3ds: Vec<_> = points
        .iter()
        .map(|p| (pose * na::Point3::new(p.x as f64, p.y as f64, p.z as f64)).coords)
        .collect();
    model.project(&p3ds)
}
