//! Headless driver: builds a simulation from config, runs it, prints the result.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use ecosim_core::SimConfig;
use ecosim_world::Simulation;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "ecosim-runner",
    version,
    about = "Run a predator/prey grid simulation without a UI"
)]
struct Cli {
    /// JSON configuration file. Missing fields take their defaults.
    #[arg(long, env = "ECOSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Number of ticks to run (overrides the config)
    #[arg(long)]
    ticks: Option<u64>,

    /// Random seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid width (overrides the config)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height (overrides the config)
    #[arg(long)]
    height: Option<i32>,

    /// Ticks between population reports, 0 to disable (overrides the config)
    #[arg(long)]
    report_interval: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn load_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimConfig::default(),
        };

        if let Some(ticks) = self.ticks {
            config.num_ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(interval) = self.report_interval {
            config.report_interval = interval;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json_logs)?;

    let config = cli.load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        seed = config.seed,
        ticks = config.num_ticks,
        seeds = config.initial_population.len(),
        "Starting ecosim runner"
    );

    let mut simulation = Simulation::new(config).context("failed to build simulation")?;
    let result = simulation.run();

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "ecosim-runner",
            "--ticks",
            "12",
            "--seed",
            "9",
            "--width",
            "40",
            "--height",
            "30",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.num_ticks, 12);
        assert_eq!(config.seed, 9);
        assert_eq!(config.world.width, 40);
        assert_eq!(config.world.height, 30);
    }

    #[test]
    fn test_cli_rejects_grid_too_small_for_seeds() {
        let cli = Cli::parse_from(["ecosim-runner", "--width", "5", "--height", "5"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_cli_missing_config_file() {
        let cli = Cli::parse_from(["ecosim-runner", "--config", "/nonexistent/ecosim.json"]);
        let err = cli.load_config().unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
