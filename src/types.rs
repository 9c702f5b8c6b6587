use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Camera pose as an axis-angle rotation plus a translation, mapping
/// reference-plane points into the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RvecTvec {
    rvec: [f64; 3],
    tvec: [f64; 3],
}

impl RvecTvec {
    pub fn new(rvec: &[f64], tvec: &[f64]) -> RvecTvec {
        RvecTvec {
            rvec: [rvec[0], rvec[1], rvec[2]],
            tvec: [tvec[0], tvec[1], tvec[2]],
        }
    }
    pub fn from_tuples(r: (f64, f64, f64), t: (f64, f64, f64)) -> RvecTvec {
        RvecTvec {
            rvec: [r.0, r.1, r.2],
            tvec: [t.0, t.1, t.2],
        }
    }
    pub fn na_rvec(&self) -> na::Vector3<f64> {
        na::Vector3::from_column_slice(&self.rvec)
    }
    pub fn na_tvec(&self) -> na::Vector3<f64> {
        na::Vector3::from_column_slice(&self.tvec)
    }
    pub fn to_na_isometry3(&self) -> na::Isometry3<f64> {
        na::Isometry3::new(self.na_tvec(), self.na_rvec())
    }
    pub fn is_finite(&self) -> bool {
        self.rvec.iter().chain(self.tvec.iter()).all(|v| v.is_finite())
    }
}

pub trait ToRvecTvec {
    fn to_rvec_tvec(&self) -> RvecTvec;
}

impl ToRvecTvec for na::Isometry3<f64> {
    fn to_rvec_tvec(&self) -> RvecTvec {
        let rvec = self.rotation.scaled_axis();
        let tvec = self.translation.vector;
        RvecTvec::new(rvec.as_slice(), tvec.as_slice())
    }
}
