use std::process::ExitCode;

use anyhow::Result;

use kinetic_app::{mount_page, AppConfig};

pub fn run(config: &AppConfig, at_ms: u64, scroll: Option<f32>) -> Result<ExitCode> {
    let mut scene = mount_page(config.viewport_size())?;
    if let Some(offset) = scroll {
        scene.scroll_to(offset);
    }

    let tick_ms = config.headless.tick_ms;
    let mut remaining = at_ms;
    while remaining > 0 {
        let step = remaining.min(tick_ms);
        scene.tick(step as f32);
        remaining -= step;
    }

    let snapshot = scene.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(ExitCode::SUCCESS)
}
