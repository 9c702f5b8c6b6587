//! OpenCV backend: features, matching, RANSAC, drawing, video and window.

pub mod display;
pub mod features;
pub mod geometric;
pub mod overlay;
pub mod reference;
pub mod tracker;
pub mod video;

pub use display::HighguiViewer;
pub use features::{FeatureMatcher, FeatureSet, OrbDetector};
pub use reference::ReferenceModel;
pub use tracker::PoseTracker;
pub use video::VideoFrameSource;
