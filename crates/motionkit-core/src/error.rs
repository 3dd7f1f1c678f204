//! Error types for MotionKit.

use thiserror::Error;

/// Main error type for MotionKit operations.
#[derive(Error, Debug)]
pub enum MotionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A committed edit would make two clips overlap on one track.
    #[error("clip {clip} would overlap another clip on track {track}")]
    Overlap { clip: String, track: usize },

    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("Camera keyframe not found: {0}")]
    KeyframeNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MotionError {
    /// True for the expected "edit rejected" outcome of user input.
    pub fn is_overlap(&self) -> bool {
        matches!(self, Self::Overlap { .. })
    }
}

/// Result type alias for MotionKit operations.
pub type Result<T> = std::result::Result<T, MotionError>;
