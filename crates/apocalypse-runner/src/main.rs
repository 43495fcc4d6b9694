//! Headless driver for the zombie apocalypse simulation.

mod telemetry;

use anyhow::{Context, Result};
use apocalypse_core::RunnerConfig;
use apocalypse_world::Scenario;
use tracing::info;

fn main() -> Result<()> {
    // Load configuration
    let config = RunnerConfig::from_env();

    telemetry::init_telemetry(&config.log_filter)?;

    info!("Starting apocalypse runner");

    let scenario = match config.scenario_path.as_deref() {
        Some(path) => {
            info!("Loading scenario from {}", path);
            Scenario::from_json_file(path)
                .with_context(|| format!("failed to load scenario {}", path))?
        }
        None => {
            info!("No scenario configured, generating a default world");
            Scenario::default()
        }
    };

    let result = scenario.execute()?;

    info!(
        steps = result.steps,
        zombies = result.zombies.len(),
        humans = result.humans.len(),
        "Run finished"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
