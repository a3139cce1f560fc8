use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use trackrun::Settings;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    log::info!("trackrun {} with {:?}", trackrun::version(), settings);

    let outcome = trackrun::run(&settings).with_context(|| {
        format!(
            "Failed to process {} into {}",
            settings.source_path.display(),
            settings.results_path.display()
        )
    })?;

    let failed = outcome.iter().filter(|(_, report)| report.is_err()).count();
    let lines: usize = outcome
        .iter()
        .filter_map(|(_, report)| report.as_ref().ok())
        .map(|report| report.lines_written)
        .sum();
    log::info!(
        "Done: {} files, {} failed, {} lines written",
        outcome.len(),
        failed,
        lines
    );

    if failed > 0 {
        bail!("{} of {} files failed", failed, outcome.len());
    }
    Ok(())
}
