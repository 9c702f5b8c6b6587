use anyhow::Result;
use log::info;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::control::FrameSource;
use crate::error::PoseError;

pub struct VideoFrameSource {
    capture: VideoCapture,
}

impl VideoFrameSource {
    pub fn open(path: &str) -> Result<Self, PoseError> {
        let capture = VideoCapture::from_file(path, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(PoseError::VideoUnopenable(path.to_string()));
        }
        info!("opened video {}", path);
        Ok(Self { capture })
    }

    /// Frame count reported by the container, if it knows one.
    pub fn frame_count(&self) -> Option<u64> {
        let count = self.capture.get(videoio::CAP_PROP_FRAME_COUNT).ok()?;
        (count.is_finite() && count > 0.0).then_some(count as u64)
    }
}

impl FrameSource for VideoFrameSource {
    type Frame = Mat;

    fn next_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn release(&mut self) -> Result<()> {
        self.capture.release()?;
        Ok(())
    }
}
