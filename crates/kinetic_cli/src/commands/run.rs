use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use kinetic_app::{run_loaded_scenario, AppConfig, HeadlessScenario};

pub fn run(config: &AppConfig, scenario: Option<&Path>, report: Option<&Path>) -> Result<ExitCode> {
    let scenario = match scenario {
        Some(path) => HeadlessScenario::from_path(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => HeadlessScenario::acceptance()?,
    };

    let report_data = run_loaded_scenario(&scenario, config.run_config())?.into_report();

    report_data.write_to_writer(&mut std::io::stdout().lock())?;
    if let Some(path) = report {
        report_data.write_to_path(path)?;
        tracing::info!(path = %path.display(), "report written");
    }

    if let Some(failure) = report_data.failure() {
        eprintln!("FAILED at {failure}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
