mod common;

use common::*;
use planar_pose_calibration::box_model::create_default_book_box;
use planar_pose_calibration::config::{DEFAULT_REFERENCE_PATH, DEFAULT_VIDEO_PATH, PipelineConfig};
use planar_pose_calibration::control::{LoopExit, LoopSummary};
use planar_pose_calibration::error::PoseError;
use planar_pose_calibration::io::{
    RunReport, load_config, object_from_json, object_to_json, write_run_report,
};
use planar_pose_calibration::optimization::CalibrationConfig;
use planar_pose_calibration::pipeline::{FrameReport, InlierMask};

#[test]
fn test_default_config() {
    let config = PipelineConfig::default();
    assert_eq!(config.reference_path, DEFAULT_REFERENCE_PATH);
    assert_eq!(config.video_path, DEFAULT_VIDEO_PATH);
    assert_eq!(config.window_title, "Pose Estimation (Book)");
    assert_eq!(config.min_inliers, 100);
    assert_eq!(config.ransac_reproj_threshold, 2.0);
    assert_eq!(config.key_wait_ms, 1);
    assert_eq!(config.orb.n_features, 500);
    assert_eq!(config.calibration.max_iteration, 50);
}

#[test]
fn test_config_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = PipelineConfig::default();
    config.video_path = "clip.mp4".to_string();
    config.ar_box.height = -80.0;
    object_to_json(&path, &config).unwrap();

    let loaded: PipelineConfig = object_from_json(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_takes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"min_inliers": 40, "ar_box": {"height": -10.0}}"#).unwrap();

    let config = load_config(path.to_str().unwrap()).unwrap();
    assert_eq!(config.min_inliers, 40);
    assert_eq!(config.ar_box.height, -10.0);
    assert_eq!(config.ar_box.x_min, 30.0);
    assert_eq!(config.reference_path, DEFAULT_REFERENCE_PATH);
}

#[test]
fn test_bad_config_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let path = path.to_str().unwrap();

    match load_config(path) {
        Err(PoseError::Config { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected {:?}", other),
    }
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        load_config(missing.to_str().unwrap()),
        Err(PoseError::Config { .. })
    ));
}

#[test]
fn test_run_report() {
    let config = PipelineConfig::default();
    let ar_box = create_default_book_box();
    let frame = synthetic_frame(0);
    let posed = FrameReport::evaluate(
        &frame,
        &InlierMask::new(vec![true; frame.len()]),
        config.min_inliers,
        &ar_box,
        &CalibrationConfig::default(),
    );
    let unposed = FrameReport::evaluate(
        &synthetic_frame(2),
        &InlierMask::none(frame.len()),
        config.min_inliers,
        &ar_box,
        &CalibrationConfig::default(),
    );
    let summary = LoopSummary {
        exit: LoopExit::UserQuit,
        frames_read: 3,
        frames_shown: 2,
    };
    let report = RunReport::new(&config, &summary, vec![posed, unposed]);
    assert_eq!(report.frames_skipped, 1);
    assert_eq!(report.posed_frames, 1);
    assert!((report.mean_focal.unwrap() - FOCAL).abs() < 1.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_run_report(&path, &report).unwrap();
    let json: serde_json::Value = object_from_json(&path).unwrap();
    assert_eq!(json["exit"], "UserQuit");
    assert_eq!(json["frames"].as_array().unwrap().len(), 2);
    assert_eq!(json["frames"][1]["focal"], 0.0);
    assert!(json["frames"][1]["pose"].is_null());
    assert!(!json["timestamp"].as_str().unwrap().is_empty());
}

#[test]
fn test_run_report_without_poses() {
    let summary = LoopSummary {
        exit: LoopExit::EndOfStream,
        frames_read: 0,
        frames_shown: 0,
    };
    let report = RunReport::new(&PipelineConfig::default(), &summary, Vec::new());
    assert_eq!(report.posed_frames, 0);
    assert!(report.mean_focal.is_none());
}
