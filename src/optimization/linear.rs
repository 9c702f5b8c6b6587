use log::debug;
use sqpnp_simple::sqpnp_solve_glam;

use crate::detected_points::FeaturePoint;
use crate::types::RvecTvec;

/// Initial pose from SQPnP on centred, focal-normalised image points.
pub fn init_pose(features: &[FeaturePoint], focal: f64, cxcy: (f64, f64)) -> Option<RvecTvec> {
    if features.len() < 3 || focal <= 0.0 {
        return None;
    }
    let cxcy = glam::Vec2::new(cxcy.0 as f32, cxcy.1 as f32);
    let (p2ds_z, p3ds): (Vec<_>, Vec<_>) = features
        .iter()
        .map(|f| ((f.p2d - cxcy) / focal as f32, f.p3d))
        .unzip();

    let Some((r, t)) = sqpnp_solve_glam(&p3ds, &p2ds_z) else {
        debug!("sqpnp found no pose for {} points", p3ds.len());
        return None;
    };
    let rt = RvecTvec::from_tuples(r, t);
    rt.is_finite().then_some(rt)
}
