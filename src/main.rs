// Sett scenario bench - entry point
// Drives the byvWBTC incident playbooks against a deterministic fork.

#![allow(dead_code)]

mod cli;
mod contracts;
mod fork;
mod scenarios;
mod types;

#[cfg(test)]
mod tests;

use clap::Parser;
use cli::{Cli, Commands, ScenarioKind};
use fork::{Fork, ForkConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.verbose {
        "debug"
    } else {
        &cli.log_level
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)),
        )
        .init();

    match cli.command {
        Commands::Run(cmd) => {
            let config = match &cmd.config {
                Some(path) => ForkConfig::load(path).map_err(|e| {
                    error!("Configuration error: {}", e);
                    anyhow::anyhow!("Configuration error: {}", e)
                })?,
                None => ForkConfig::default(),
            };

            let selected: Vec<ScenarioKind> = match cmd.scenario {
                ScenarioKind::All => ScenarioKind::all().to_vec(),
                single => vec![single],
            };

            for scenario in selected {
                info!("running scenario: {}", scenario.name());

                // Every scenario gets its own fresh fork
                let mut fork = Fork::from_config(&config);
                let result = match scenario {
                    ScenarioKind::Pause => scenarios::run_pause(&mut fork),
                    ScenarioKind::Blacklist => scenarios::run_blacklist(&mut fork),
                    ScenarioKind::Treasury => scenarios::run_treasury(&mut fork),
                    ScenarioKind::All => unreachable!("expanded above"),
                };

                if let Err(e) = result {
                    error!("scenario {} failed: {:#}", scenario.name(), e);
                    return Err(e);
                }
                println!("ok: {}", scenario.name());
            }
        }

        Commands::List => {
            for scenario in ScenarioKind::all() {
                println!("{:<12} {}", scenario.name(), scenario.describe());
            }
        }
    }

    Ok(())
}
