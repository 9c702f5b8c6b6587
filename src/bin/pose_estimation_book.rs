use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use opencv::core::Mat;
use planar_pose_calibration::config::PipelineConfig;
use planar_pose_calibration::control::{HeadlessViewer, run_loop};
use planar_pose_calibration::io::{RunReport, load_config, write_run_report};
use planar_pose_calibration::pipeline::{FrameOutcome, FrameReport};
use planar_pose_calibration::vision::{HighguiViewer, PoseTracker, VideoFrameSource};

#[derive(Parser)]
#[command(version, about, author)]
struct PoseCli {
    /// reference image of the planar target
    reference: Option<String>,

    /// video showing the target
    video: Option<String>,

    /// json pipeline config, missing fields take their defaults
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    min_inliers: Option<usize>,

    /// RANSAC reprojection threshold in pixels
    #[arg(long)]
    reproj_threshold: Option<f64>,

    #[arg(long)]
    key_wait_ms: Option<i32>,

    /// no window, run through the video as fast as possible
    #[arg(long)]
    headless: bool,

    /// write a json run report
    #[arg(long)]
    report: Option<String>,

    /// save a rerun recording (.rrd)
    #[cfg(feature = "visualization")]
    #[arg(long)]
    rerun: Option<String>,
}

impl PoseCli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(reference) = &self.reference {
            config.reference_path = reference.clone();
        }
        if let Some(video) = &self.video {
            config.video_path = video.clone();
        }
        if let Some(min_inliers) = self.min_inliers {
            config.min_inliers = min_inliers;
        }
        if let Some(threshold) = self.reproj_threshold {
            config.ransac_reproj_threshold = threshold;
        }
        if let Some(key_wait_ms) = self.key_wait_ms {
            config.key_wait_ms = key_wait_ms;
        }
        Ok(config)
    }
}

fn run(cli: &PoseCli) -> Result<()> {
    let config = cli.pipeline_config()?;

    let mut tracker = PoseTracker::new(&config)?;
    let mut source = VideoFrameSource::open(&config.video_path)?;

    #[cfg(feature = "visualization")]
    let recording = match &cli.rerun {
        Some(path) => Some(rerun::RecordingStreamBuilder::new("pose_estimation_book").save(path)?),
        None => None,
    };

    let progress = cli.headless.then(|| {
        let pb = ProgressBar::new(source.frame_count().unwrap_or(0));
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} frames {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    });

    let mut frames: Vec<FrameReport> = Vec::new();
    let mut process = |frame_idx: usize, frame: &Mat| -> Result<Option<Mat>> {
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        match tracker.process(frame_idx, frame)? {
            FrameOutcome::Skipped(_) => Ok(None),
            FrameOutcome::Rendered { image, report } => {
                #[cfg(feature = "visualization")]
                if let Some(recording) = &recording {
                    planar_pose_calibration::visualization::log_frame_report(
                        recording, "/cam0", &report,
                    )?;
                }
                frames.push(report);
                Ok(Some(image))
            }
        }
    };

    let summary = if cli.headless {
        let mut viewer = HeadlessViewer::<Mat>::new();
        run_loop(&mut source, &mut viewer, config.key_wait_ms, &mut process)?
    } else {
        let mut viewer = HighguiViewer::new(&config.window_title)?;
        run_loop(&mut source, &mut viewer, config.key_wait_ms, &mut process)?
    };
    if let Some(pb) = &progress {
        pb.finish_with_message(format!("{:?}", summary.exit));
    }

    let posed = frames.iter().filter(|f| f.has_pose()).count();
    info!(
        "{} frames read, {} shown, {} with a pose",
        summary.frames_read, summary.frames_shown, posed
    );
    if let Some(path) = &cli.report {
        write_run_report(path, &RunReport::new(&config, &summary, frames))?;
        info!("report written to {}", path);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = PoseCli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            // -1 as a process status byte
            ExitCode::from(255)
        }
    }
}
