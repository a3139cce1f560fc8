//! Error types for the batch runner

use idtrack::TrackError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the batch runner
pub type Result<T> = std::result::Result<T, RunError>;

/// Errors that can occur while reading, tracking or writing a sequence
#[derive(Error, Debug)]
pub enum RunError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{}:{line}: {message}", .path.display())]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Settings error: {0}")]
    SettingsError(#[from] serde_json::Error),

    #[error("Tracking error: {0}")]
    TrackingError(#[from] TrackError),
}

impl RunError {
    pub fn parse<P: Into<PathBuf>, S: Into<String>>(path: P, line: usize, msg: S) -> Self {
        Self::ParseError {
            path: path.into(),
            line,
            message: msg.into(),
        }
    }
}
