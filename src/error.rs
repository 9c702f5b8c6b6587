use thiserror::Error;

/// Startup failures; each one ends the program with exit code -1.
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("cannot read reference image {0}")]
    ReferenceUnreadable(String),
    #[error("no features found in reference image {0}")]
    ReferenceFeatureless(String),
    #[error("cannot open video {0}")]
    VideoUnopenable(String),
    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },
    #[cfg(feature = "opencv")]
    #[error(transparent)]
    Backend(#[from] opencv::Error),
}
