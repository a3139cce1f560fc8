//! Batch runner for the identity tracker
//!
//! Reads comma-separated detection files, tracks every sequence with
//! [`idtrack`] and writes the identity-stamped detections back out. Files in
//! the source directory are processed in parallel.

pub mod batch;
pub mod error;
pub mod reader;
pub mod settings;
pub mod writer;

pub use batch::{run, BatchOutcome, FileReport};
pub use error::{Result, RunError};
pub use settings::Settings;

/// Get library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
