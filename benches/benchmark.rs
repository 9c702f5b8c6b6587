use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nalgebra as na;
use planar_pose_calibration::camera_model::{Pinhole, image_center, project_with_pose};
use planar_pose_calibration::detected_points::FeaturePoint;
use planar_pose_calibration::optimization::{
    CalibrationConfig, calibrate_single_view, dlt_homography, factors::FocalReprojectionFactor,
    planar_homography_to_focal,
};
use planar_pose_calibration::types::RvecTvec;
use tiny_solver::factors::Factor;

const IMG_W_H: (u32, u32) = (640, 480);

fn synthetic_features() -> Vec<FeaturePoint> {
    let camera = Pinhole::centered(800.0, IMG_W_H.0, IMG_W_H.1);
    let pose = RvecTvec::new(&[0.3, -0.2, 0.05], &[-100.0, -125.0, 600.0]);
    let grid: Vec<_> = (0..=25)
        .flat_map(|y| (0..=20).map(move |x| glam::Vec3::new(x as f32 * 10.0, y as f32 * 10.0, 0.0)))
        .collect();
    project_with_pose(&camera, &pose.to_na_isometry3(), &grid)
        .into_iter()
        .zip(&grid)
        .filter_map(|(p2d, p3d)| {
            p2d.map(|p| FeaturePoint {
                p2d: glam::Vec2::new(p.x as f32, p.y as f32),
                p3d: *p3d,
            })
        })
        .collect()
}

fn bench_homography_focal(c: &mut Criterion) {
    let features = synthetic_features();
    let (plane, image): (Vec<_>, Vec<_>) = features
        .iter()
        .map(|f| {
            (
                na::Vector2::new(f.p3d.x as f64, f.p3d.y as f64),
                na::Vector2::new(f.p2d.x as f64, f.p2d.y as f64),
            )
        })
        .unzip();
    let cxcy = image_center(IMG_W_H.0, IMG_W_H.1);

    c.bench_function("dlt_homography_to_focal", |b| {
        b.iter(|| {
            dlt_homography(black_box(&plane), black_box(&image))
                .and_then(|h| planar_homography_to_focal(&h, cxcy))
        })
    });
}

fn bench_reprojection_residual(c: &mut Criterion) {
    let f = FeaturePoint {
        p2d: glam::Vec2::new(320.0, 240.0),
        p3d: glam::Vec3::new(100.0, 120.0, 0.0),
    };
    let factor = FocalReprojectionFactor::new(&f.p3d, &f.p2d, image_center(IMG_W_H.0, IMG_W_H.1), IMG_W_H);
    let all_params = vec![
        na::dvector![800.0],
        na::dvector![0.3, -0.2, 0.05],
        na::dvector![-100.0, -125.0, 600.0],
    ];

    c.bench_function("focal_reprojection_residual", |b| {
        b.iter(|| -> na::DVector<f64> { factor.residual_func(black_box(&all_params)) })
    });
}

fn bench_single_view_calibration(c: &mut Criterion) {
    let features = synthetic_features();
    let config = CalibrationConfig::default();

    c.bench_function("calibrate_single_view", |b| {
        b.iter(|| calibrate_single_view(black_box(&features), IMG_W_H, &config))
    });
}

criterion_group!(
    benches,
    bench_homography_focal,
    bench_reprojection_residual,
    bench_single_view_calibration
);
criterion_main!(benches);
