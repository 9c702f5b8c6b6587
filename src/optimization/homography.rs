use log::debug;
use nalgebra as na;

/// Hartley normalisation: zero mean, average distance sqrt(2).
fn normalize_points_2d(pts: &[na::Vector2<f64>]) -> Option<(Vec<na::Vector2<f64>>, na::Matrix3<f64>)> {
    let n = pts.len() as f64;
    let mean = pts.iter().fold(na::Vector2::zeros(), |acc, p| acc + p) / n;
    let avg_dist = pts.iter().map(|p| (p - mean).norm()).sum::<f64>() / n;
    if !avg_dist.is_finite() || avg_dist < f64::EPSILON {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / avg_dist;
    let t = na::Matrix3::new(s, 0.0, -s * mean.x, 0.0, s, -s * mean.y, 0.0, 0.0, 1.0);
    let normalized = pts.iter().map(|p| (p - mean) * s).collect();
    Some((normalized, t))
}

/// Normalised DLT estimate of `H` with `image ~ H * plane`.
///
/// All points are used; there is no outlier rejection. The result is scaled
/// so that `H[(2, 2)] == 1` when that entry is not zero.
pub fn dlt_homography(
    plane: &[na::Vector2<f64>],
    image: &[na::Vector2<f64>],
) -> Option<na::Matrix3<f64>> {
    let n = plane.len();
    if n < 4 || image.len() != n {
        debug!("homography needs at least 4 pairs, got {}", n);
        return None;
    }
    let (plane_n, t_plane) = normalize_points_2d(plane)?;
    let (image_n, t_image) = normalize_points_2d(image)?;

    let mut a = na::DMatrix::<f64>::zeros(2 * n.max(5), 9);
    for (i, (pw, pi)) in plane_n.iter().zip(image_n.iter()).enumerate() {
        let (x, y) = (pw.x, pw.y);
        let (u, v) = (pi.x, pi.y);
        let r0 = 2 * i;
        let r1 = 2 * i + 1;

        a[(r0, 0)] = -x;
        a[(r0, 1)] = -y;
        a[(r0, 2)] = -1.0;
        a[(r0, 6)] = u * x;
        a[(r0, 7)] = u * y;
        a[(r0, 8)] = u;

        a[(r1, 3)] = -x;
        a[(r1, 4)] = -y;
        a[(r1, 5)] = -1.0;
        a[(r1, 6)] = v * x;
        a[(r1, 7)] = v * y;
        a[(r1, 8)] = v;
    }

    let svd = a.svd(false, true);
    let v_t = svd.v_t?;
    // nalgebra does not sort singular values
    let (min_idx, _) = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|x, y| x.1.total_cmp(y.1))?;
    let h_vec = v_t.row(min_idx);

    let mut h_mat = na::Matrix3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            h_mat[(r, c)] = h_vec[3 * r + c];
        }
    }
    let t_image_inv = t_image.try_inverse()?;
    h_mat = t_image_inv * h_mat * t_plane;

    let scale = h_mat[(2, 2)];
    if scale.abs() > f64::EPSILON {
        h_mat /= scale;
    }
    if h_mat.iter().all(|v| v.is_finite()) {
        Some(h_mat)
    } else {
        None
    }
}

/// Focal length of a square-pixel camera with a known principal point, from
/// the homography of a plane (`image ~ H * plane`).
///
/// Uses the two constraints of the first two rotation columns (orthogonal,
/// same norm) and solves them jointly for `1 / f^2`. Returns `None` for
/// degenerate views such as a plane parallel to the image.
pub fn planar_homography_to_focal(h_mat: &na::Matrix3<f64>, cxcy: (f64, f64)) -> Option<f64> {
    let shift = na::Matrix3::new(1.0, 0.0, -cxcy.0, 0.0, 1.0, -cxcy.1, 0.0, 0.0, 1.0);
    let h = shift * h_mat;
    let h = h / h.norm();
    let h1 = h.column(0);
    let h2 = h.column(1);

    let a0 = h1[0] * h2[0] + h1[1] * h2[1];
    let b0 = h1[2] * h2[2];
    let a1 = h1[0] * h1[0] + h1[1] * h1[1] - h2[0] * h2[0] - h2[1] * h2[1];
    let b1 = h1[2] * h1[2] - h2[2] * h2[2];

    let denom = a0 * a0 + a1 * a1;
    if denom < f64::EPSILON {
        debug!("degenerate homography for focal estimation");
        return None;
    }
    let inv_f2 = -(a0 * b0 + a1 * b1) / denom;
    if !inv_f2.is_finite() || inv_f2 <= 0.0 {
        debug!("1/f^2 = {} is not positive", inv_f2);
        return None;
    }
    Some(1.0 / inv_f2.sqrt())
}
