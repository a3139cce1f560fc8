//! JSON settings for a batch run

use crate::error::Result;
use idtrack::TrackerConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory holding the `*.txt` detection files
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,
    /// Directory the tracked files are written to
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

fn default_source_path() -> PathBuf { PathBuf::from("data/source-sdp") }
fn default_results_path() -> PathBuf { PathBuf::from("data/results") }

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            results_path: default_results_path(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate the tracker block
    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(content)?;
        settings.tracker.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
