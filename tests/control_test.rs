use std::collections::VecDeque;

use anyhow::{Result, bail};
use planar_pose_calibration::control::{
    FrameSource, HeadlessViewer, KEY_ESC, KEY_SPACE, KeyAction, LoopExit, Viewer, run_loop,
};

struct ScriptedSource {
    frames: VecDeque<u32>,
    fail_on_read: bool,
    releases: usize,
}

impl ScriptedSource {
    fn new(n: u32) -> Self {
        Self {
            frames: (0..n).collect(),
            fail_on_read: false,
            releases: 0,
        }
    }
}

impl FrameSource for ScriptedSource {
    type Frame = u32;

    fn next_frame(&mut self) -> Result<Option<u32>> {
        if self.fail_on_read {
            bail!("decoder failure");
        }
        Ok(self.frames.pop_front())
    }

    fn release(&mut self) -> Result<()> {
        self.releases += 1;
        Ok(())
    }
}

#[derive(Default)]
struct ScriptedViewer {
    keys: VecDeque<i32>,
    waits: Vec<i32>,
    shown: Vec<u32>,
}

impl ScriptedViewer {
    fn with_keys(keys: &[i32]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Viewer for ScriptedViewer {
    type Image = u32;

    fn show(&mut self, image: &u32) -> Result<()> {
        self.shown.push(*image);
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: i32) -> Result<i32> {
        self.waits.push(delay_ms);
        Ok(self.keys.pop_front().unwrap_or(-1))
    }
}

fn show_all(_idx: usize, frame: &u32) -> Result<Option<u32>> {
    Ok(Some(*frame))
}

#[test]
fn test_key_actions() {
    assert_eq!(KeyAction::from_key(-1), KeyAction::Continue);
    assert_eq!(KeyAction::from_key(KEY_ESC), KeyAction::Quit);
    assert_eq!(KeyAction::from_key(KEY_SPACE), KeyAction::Pause);
    assert_eq!(KeyAction::from_key('q' as i32), KeyAction::Continue);
    // modifier bits above the low byte are ignored
    assert_eq!(KeyAction::from_key(0x10_0000 | KEY_ESC), KeyAction::Quit);
}

#[test]
fn test_loop_runs_to_end_of_stream() {
    let mut source = ScriptedSource::new(3);
    let mut viewer = ScriptedViewer::default();
    let summary = run_loop(&mut source, &mut viewer, 1, show_all).unwrap();

    assert_eq!(summary.exit, LoopExit::EndOfStream);
    assert_eq!(summary.frames_read, 3);
    assert_eq!(summary.frames_shown, 3);
    assert_eq!(viewer.shown, vec![0, 1, 2]);
    assert_eq!(viewer.waits, vec![1, 1, 1]);
    assert_eq!(source.releases, 1);
}

#[test]
fn test_escape_quits_and_releases_once() {
    let mut source = ScriptedSource::new(10);
    let mut viewer = ScriptedViewer::with_keys(&[-1, KEY_ESC]);
    let summary = run_loop(&mut source, &mut viewer, 1, show_all).unwrap();

    assert_eq!(summary.exit, LoopExit::UserQuit);
    assert_eq!(summary.frames_read, 2);
    assert_eq!(viewer.shown, vec![0, 1]);
    assert_eq!(source.releases, 1);
    assert_eq!(source.frames.len(), 8);
}

#[test]
fn test_space_pauses_until_next_key() {
    let mut source = ScriptedSource::new(5);
    let mut viewer = ScriptedViewer::with_keys(&[KEY_SPACE, 'a' as i32, -1, KEY_SPACE, KEY_ESC]);
    let summary = run_loop(&mut source, &mut viewer, 1, show_all).unwrap();

    // pause blocks with delay 0, and the key that ends the pause is evaluated
    assert_eq!(viewer.waits, vec![1, 0, 1, 1, 0]);
    assert_eq!(summary.exit, LoopExit::UserQuit);
    assert_eq!(summary.frames_read, 3);
    assert_eq!(source.releases, 1);
}

#[test]
fn test_skipped_frames_are_not_shown() {
    let mut source = ScriptedSource::new(6);
    let mut viewer = ScriptedViewer::default();
    let summary = run_loop(&mut source, &mut viewer, 5, |idx, frame| {
        Ok((idx % 2 == 0).then_some(*frame * 10))
    })
    .unwrap();

    assert_eq!(viewer.shown, vec![0, 20, 40]);
    assert_eq!(viewer.waits.len(), 3);
    assert_eq!(summary.frames_read, 6);
    assert_eq!(summary.frames_shown, 3);
    assert_eq!(summary.frames_skipped(), 3);
}

#[test]
fn test_processing_error_still_releases() {
    let mut source = ScriptedSource::new(4);
    let mut viewer = ScriptedViewer::default();
    let result = run_loop(&mut source, &mut viewer, 1, |idx, frame| {
        if idx == 2 {
            bail!("backend failure");
        }
        Ok(Some(*frame))
    });

    assert!(result.is_err());
    assert_eq!(viewer.shown, vec![0, 1]);
    assert_eq!(source.releases, 1);
}

#[test]
fn test_read_error_still_releases() {
    let mut source = ScriptedSource::new(4);
    source.fail_on_read = true;
    let mut viewer = ScriptedViewer::default();
    let result = run_loop(&mut source, &mut viewer, 1, show_all);

    assert!(result.is_err());
    assert!(viewer.shown.is_empty());
    assert_eq!(source.releases, 1);
}

#[test]
fn test_headless_viewer_never_blocks() {
    let mut source = ScriptedSource::new(4);
    let mut viewer = HeadlessViewer::<u32>::new();
    assert_eq!(viewer.wait_key(0).unwrap(), -1);

    let summary = run_loop(&mut source, &mut viewer, 0, show_all).unwrap();
    assert_eq!(summary.exit, LoopExit::EndOfStream);
    assert_eq!(viewer.shown(), 4);
    assert_eq!(source.releases, 1);
}
