use opencv::core::{DMatch, Mat, Point, Scalar, Vector};
use opencv::features2d::{self, DrawMatchesFlags};
use opencv::imgproc::{self, FONT_HERSHEY_PLAIN, LINE_8};

use super::features::FeatureSet;
use crate::box_model::BoxProjection;
use crate::pipeline::InlierMask;

// BGR
const MATCH_COLOR: (f64, f64, f64) = (0.0, 0.0, 255.0);
const SINGLE_POINT_COLOR: (f64, f64, f64) = (0.0, 127.0, 0.0);
const LOWER_COLOR: (f64, f64, f64) = (255.0, 0.0, 0.0);
const EDGE_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);
const UPPER_COLOR: (f64, f64, f64) = (0.0, 0.0, 255.0);
const CAPTION_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);
const BOX_THICKNESS: i32 = 2;

fn bgr(c: (f64, f64, f64)) -> Scalar {
    Scalar::new(c.0, c.1, c.2, 0.0)
}

/// Frame and reference side by side with the inlier matches drawn; the
/// frame keeps its pixel coordinates on the left.
pub fn draw_inlier_matches(
    frame: &Mat,
    frame_features: &FeatureSet,
    reference: &Mat,
    reference_features: &FeatureSet,
    matches: &Vector<DMatch>,
    mask: &InlierMask,
) -> opencv::Result<Mat> {
    let mut out = Mat::default();
    let matches_mask = Vector::<i8>::from_iter(mask.to_char_mask());
    features2d::draw_matches(
        frame,
        &frame_features.keypoints,
        reference,
        &reference_features.keypoints,
        matches,
        &mut out,
        bgr(MATCH_COLOR),
        bgr(SINGLE_POINT_COLOR),
        &matches_mask,
        DrawMatchesFlags::DEFAULT,
    )?;
    Ok(out)
}

pub fn draw_box(image: &mut Mat, projection: &BoxProjection) -> opencv::Result<()> {
    let (lower, upper) = projection.rounded();
    let to_points =
        |pts: [(i32, i32); 4]| Vector::<Point>::from_iter(pts.map(|(x, y)| Point::new(x, y)));
    let line_lower = to_points(lower);
    let line_upper = to_points(upper);

    imgproc::polylines(image, &line_lower, true, bgr(LOWER_COLOR), BOX_THICKNESS, LINE_8, 0)?;
    for (l, u) in line_lower.iter().zip(line_upper.iter()) {
        imgproc::line(image, l, u, bgr(EDGE_COLOR), BOX_THICKNESS, LINE_8, 0)?;
    }
    imgproc::polylines(image, &line_upper, true, bgr(UPPER_COLOR), BOX_THICKNESS, LINE_8, 0)?;
    Ok(())
}

pub fn draw_caption(image: &mut Mat, text: &str) -> opencv::Result<()> {
    imgproc::put_text(
        image,
        text,
        Point::new(5, 15),
        FONT_HERSHEY_PLAIN,
        1.0,
        bgr(CAPTION_COLOR),
        1,
        LINE_8,
        false,
    )
}
