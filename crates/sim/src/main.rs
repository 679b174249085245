//! Pinpointer scenario simulator.
//!
//! Loads a RON scenario, drives a [`TrackerRuntime`] through its ticks and
//! prints what every device shows after each one.
//!
//! ```bash
//! cargo run -p pinpointer-sim -- --ticks 20 --format json
//! RUST_LOG=pinpointer_runtime=debug cargo run -p pinpointer-sim -- path/to/scenario.ron
//! ```

mod config;
mod driver;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use config::SimConfig;
use driver::{Simulation, TickOutput};
use pinpointer_content::{ScenarioLoader, bundled_data_dir};
use pinpointer_runtime::TrackerRuntime;

/// Run a pinpointer scenario and print device readings per tick
#[derive(Parser)]
#[command(name = "pinpointer-sim")]
#[command(version)]
struct Cli {
    /// Scenario file (RON). Defaults to the bundled disk hunt.
    scenario: Option<PathBuf>,

    /// Number of ticks to run, overriding the scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also write logs to `<dir>/sim.log` (env: SIM_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One line per device per tick
    Text,
    /// One JSON object per tick
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = SimConfig::from_env();
    if cli.log_dir.is_some() {
        config.log_dir = cli.log_dir.clone();
    }

    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let path = cli
        .scenario
        .unwrap_or_else(|| bundled_data_dir().join("scenarios").join("disk_hunt.ron"));
    let scenario = ScenarioLoader::load(&path)?;
    let ticks = cli.ticks.unwrap_or(scenario.ticks);

    tracing::info!(
        "Running {} for {} ticks ({} entities, {} devices)",
        path.display(),
        ticks,
        scenario.entities.len(),
        scenario.devices.len()
    );

    let runtime = TrackerRuntime::builder()
        .config(config.runtime.clone())
        .build()
        .await?;
    let mut sim = Simulation::setup(runtime.handle(), &scenario).await?;

    for tick in 1..=ticks {
        let output = sim.step(&scenario, tick).await?;
        print_tick(&output, cli.format)?;
        if let Some(delay) = config.tick_delay {
            tokio::time::sleep(delay).await;
        }
    }

    drop(sim);
    runtime.shutdown().await?;
    Ok(())
}

fn print_tick(output: &TickOutput, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(output)?),
        Format::Text => {
            for view in &output.devices {
                let reading = &view.reading;
                let target = match view.snapshot.target {
                    Some(id) => id.to_string(),
                    None => "-".to_string(),
                };
                println!(
                    "tick {:>3} {} [{}] target={} name={} band={} angle={:+.2}",
                    output.tick,
                    view.id,
                    view.status,
                    target,
                    reading.target_name.as_deref().unwrap_or("-"),
                    reading.distance_band,
                    reading.arrow_angle.radians(),
                );
            }
        }
    }
    Ok(())
}
