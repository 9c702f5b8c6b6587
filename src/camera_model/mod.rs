pub mod generic;
pub mod pinhole;

pub use generic::{CameraModel, project_with_pose};
pub use pinhole::{Pinhole, image_center};
