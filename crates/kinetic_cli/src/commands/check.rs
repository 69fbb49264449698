use std::process::ExitCode;

use anyhow::Result;

use kinetic_app::{mount_page, run_loaded_scenario, AppConfig, HeadlessScenario};

pub fn run(config: &AppConfig) -> Result<ExitCode> {
    config.validate()?;
    let scene = mount_page(config.viewport_size())?;

    let viewport = scene.viewport();
    println!("Viewport: {} x {}", viewport.width, viewport.height);
    println!("Elements: {}", scene.element_ids().count());
    println!(
        "Content height: {} (max scroll {})",
        scene.scroll().content_height(),
        scene.scroll().max_offset()
    );

    let scenario = HeadlessScenario::acceptance()?;
    let outcome = run_loaded_scenario(&scenario, config.run_config())?;
    let report = outcome.report();
    println!(
        "Acceptance: {} of {} steps, {} frames ({} ms)",
        report.steps_run,
        scenario.steps.len(),
        report.elapsed_frames,
        report.elapsed_ms
    );

    if let Some(failure) = report.failure() {
        println!("\nFAILED at {failure}");
        return Ok(ExitCode::FAILURE);
    }

    println!("\nOK");
    Ok(ExitCode::SUCCESS)
}
