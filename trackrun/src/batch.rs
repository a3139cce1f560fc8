//! Parallel processing of a directory of detection files

use crate::error::Result;
use crate::settings::Settings;
use crate::{reader, writer};
use idtrack::TrackerConfig;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Summary of one processed sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Frames holding at least one input detection
    pub frames: usize,
    /// Identities allocated by the tracker
    pub identities: u32,
    pub lines_written: usize,
}

/// Outcome of a batch run, one entry per input file in name order
pub type BatchOutcome = Vec<(PathBuf, Result<FileReport>)>;

/// `*.txt` files directly under `dir`, sorted by name
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read, track and write a single sequence
pub fn process_file(
    input: &Path,
    results_dir: &Path,
    config: &TrackerConfig,
) -> Result<FileReport> {
    let start = Instant::now();
    let frames = reader::read(input)?;
    let num_frames = frames.num_frames();

    let result = idtrack::process(frames, config)?;

    let output = match input.file_name() {
        Some(name) => results_dir.join(name),
        None => results_dir.join("results.txt"),
    };
    let lines_written = writer::write(&output, &result, config.min_trajectory_length)?;

    log::info!(
        "{}: {} frames, {} identities, {} lines in {:.2?}",
        input.display(),
        num_frames,
        result.identities,
        lines_written,
        start.elapsed()
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        frames: num_frames,
        identities: result.identities,
        lines_written,
    })
}

/// Process every source file in parallel. Per-file failures are logged and
/// reported; only failing to list or create the directories aborts the run.
pub fn run(settings: &Settings) -> Result<BatchOutcome> {
    fs::create_dir_all(&settings.results_path)?;
    let files = source_files(&settings.source_path)?;
    log::info!(
        "Processing {} files from {}",
        files.len(),
        settings.source_path.display()
    );

    let outcome: BatchOutcome = files
        .into_par_iter()
        .map(|input| {
            let report = process_file(&input, &settings.results_path, &settings.tracker);
            if let Err(e) = &report {
                log::error!("Failed to process {}: {}", input.display(), e);
            }
            (input, report)
        })
        .collect();

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_source_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "notes.md"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = source_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_missing_source_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(source_files(&dir.path().join("absent")).is_err());
    }
}
