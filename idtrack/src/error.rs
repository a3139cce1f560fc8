//! Error types for the identity tracking core

use thiserror::Error;

/// Result type alias for the tracking core
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors raised while configuring or running the tracker
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Unrecognized modality: {0}")]
    UnrecognizedModality(String),

    #[error("Unrecognized solver: {0}")]
    UnrecognizedSolver(String),

    #[error("Unrecognized refinement: {0}")]
    UnrecognizedRefinement(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Invalid joint count: expected {expected}, got {actual}")]
    InvalidJointCount { expected: usize, actual: usize },

    #[error("Joint count mismatch: previous detection has {previous}, current has {current}")]
    JointCountMismatch { previous: usize, current: usize },

    #[error("Non-finite cost at ({row}, {col})")]
    NonFiniteCost { row: usize, col: usize },

    #[error("Detection in frame {frame_index} has no identity")]
    MissingIdentity { frame_index: u32 },

    #[error("Cost matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl TrackError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
