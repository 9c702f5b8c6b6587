//! Display/control loop, independent of the imaging backend.

use std::marker::PhantomData;

use anyhow::Result;
use log::{debug, info};
use serde::Serialize;

pub const KEY_ESC: i32 = 27;
pub const KEY_SPACE: i32 = 32;

/// Sequential frame supplier. `None` marks the end of the stream.
pub trait FrameSource {
    type Frame;
    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;
    fn release(&mut self) -> Result<()>;
}

/// Window that shows composited frames and reports key presses.
pub trait Viewer {
    type Image;
    fn show(&mut self, image: &Self::Image) -> Result<()>;
    /// Waits up to `delay_ms` for a key; 0 waits forever. Returns -1 on
    /// timeout.
    fn wait_key(&mut self, delay_ms: i32) -> Result<i32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Pause,
    Quit,
}

impl KeyAction {
    pub fn from_key(key: i32) -> KeyAction {
        if key < 0 {
            return KeyAction::Continue;
        }
        match key & 0xff {
            KEY_SPACE => KeyAction::Pause,
            KEY_ESC => KeyAction::Quit,
            _ => KeyAction::Continue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopExit {
    EndOfStream,
    UserQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopSummary {
    pub exit: LoopExit,
    pub frames_read: usize,
    pub frames_shown: usize,
}

impl LoopSummary {
    pub fn frames_skipped(&self) -> usize {
        self.frames_read - self.frames_shown
    }
}

/// Runs the frame loop until the stream ends or the user quits.
///
/// `process` gets the frame index and the frame and returns the image to
/// show, or `None` to skip the frame without showing it or waiting for a
/// key. The source is released exactly once on every exit path.
pub fn run_loop<S, V, F>(
    source: &mut S,
    viewer: &mut V,
    key_wait_ms: i32,
    mut process: F,
) -> Result<LoopSummary>
where
    S: FrameSource,
    V: Viewer,
    F: FnMut(usize, &S::Frame) -> Result<Option<V::Image>>,
{
    let mut frames_read = 0;
    let mut frames_shown = 0;
    let mut drive = || -> Result<LoopExit> {
        while let Some(frame) = source.next_frame()? {
            let frame_idx = frames_read;
            frames_read += 1;
            let Some(image) = process(frame_idx, &frame)? else {
                continue;
            };
            viewer.show(&image)?;
            frames_shown += 1;

            let mut key = viewer.wait_key(key_wait_ms)?;
            if KeyAction::from_key(key) == KeyAction::Pause {
                debug!("paused at frame {}", frame_idx);
                key = viewer.wait_key(0)?;
            }
            if KeyAction::from_key(key) == KeyAction::Quit {
                return Ok(LoopExit::UserQuit);
            }
        }
        Ok(LoopExit::EndOfStream)
    };
    let exit = drive();
    source.release()?;
    let exit = exit?;
    info!(
        "loop ended ({:?}) after {} frames, {} shown",
        exit, frames_read, frames_shown
    );
    Ok(LoopSummary {
        exit,
        frames_read,
        frames_shown,
    })
}

/// Viewer without a window: nothing is shown and every key-wait times out.
#[derive(Debug)]
pub struct HeadlessViewer<I> {
    shown: usize,
    _image: PhantomData<I>,
}

impl<I> HeadlessViewer<I> {
    pub fn new() -> Self {
        Self {
            shown: 0,
            _image: PhantomData,
        }
    }
    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl<I> Default for HeadlessViewer<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Viewer for HeadlessViewer<I> {
    type Image = I;
    fn show(&mut self, _image: &I) -> Result<()> {
        self.shown += 1;
        Ok(())
    }
    fn wait_key(&mut self, _delay_ms: i32) -> Result<i32> {
        Ok(-1)
    }
}
