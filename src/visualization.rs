use anyhow::Result;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rerun::{RecordingStream, TimeCell};

use crate::pipeline::FrameReport;

pub fn id_to_color(id: usize) -> (u8, u8, u8, u8) {
    let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
    let color_num = rng.random_range(0..2u32.pow(24));
    (
        ((color_num >> 16) % 256) as u8,
        ((color_num >> 8) % 256) as u8,
        (color_num % 256) as u8,
        255,
    )
}

/// rerun use top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[(f32, f32)]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|(x, y)| (*x + 0.5, *y + 0.5)).collect()
}

/// Logs one rendered frame on the `frame` sequence timeline: inlier points
/// coloured by reference keypoint, the box edges and the caption.
pub fn log_frame_report(recording: &RecordingStream, topic: &str, report: &FrameReport) -> Result<()> {
    recording.set_time("frame", TimeCell::from_sequence(report.frame_idx as i64));

    let (pts, colors): (Vec<_>, Vec<_>) = report
        .inliers
        .iter()
        .map(|(id, p)| ((p.x, p.y), id_to_color(*id)))
        .unzip();
    recording.log(
        format!("{}/inliers", topic),
        &rerun::Points2D::new(rerun_shift(&pts))
            .with_colors(colors)
            .with_radii([rerun::Radius::new_ui_points(3.0)]),
    )?;

    if let Some(projection) = &report.box_projection {
        let closed = |corners: &[glam::Vec2; 4]| {
            let mut strip: Vec<(f32, f32)> = corners.iter().map(|p| (p.x, p.y)).collect();
            strip.push((corners[0].x, corners[0].y));
            rerun_shift(&strip)
        };
        let mut strips = vec![closed(&projection.lower), closed(&projection.upper)];
        strips.extend(
            projection
                .vertical_edges()
                .iter()
                .map(|(l, u)| rerun_shift(&[(l.x, l.y), (u.x, u.y)])),
        );
        // rgb: lower blue, upper red, edges green
        let mut colors = vec![(0u8, 0u8, 255u8, 255u8), (255, 0, 0, 255)];
        colors.extend([(0, 255, 0, 255); 4]);
        recording.log(
            format!("{}/box", topic),
            &rerun::LineStrips2D::new(strips).with_colors(colors),
        )?;
    } else {
        recording.log(format!("{}/box", topic), &rerun::Clear::flat())?;
    }

    recording.log(format!("{}/caption", topic), &rerun::TextLog::new(report.caption()))?;
    Ok(())
}
