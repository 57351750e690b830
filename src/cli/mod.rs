// CLI - command line interface for the Sett scenario bench
// Principle: simple, clear, composable commands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sett scenario bench - byvWBTC incident-response playbooks
#[derive(Parser, Debug)]
#[command(name = "sett-bench")]
#[command(author = "Sett Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drive the byvWBTC incident scenarios against a seeded fork")]
#[command(long_about = r#"
Runs the byvWBTC incident-response playbooks against a deterministic
forked-chain fixture: the wrapped vault, its underlying token, the Global
Access Control module, and the proxy admin.

Run every scenario:
  sett-bench run all

Run one scenario against a custom fork config:
  sett-bench run pause --config fork.json
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "SETT_LOG")]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one or all scenarios against a fresh fork
    Run(RunCmd),

    /// List the available scenarios
    List,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Scenario to run
    #[arg(value_enum)]
    pub scenario: ScenarioKind,

    /// Fork config file (JSON); defaults to the pinned mainnet seed
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Selectable scenarios
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Global pause locks every vault operation
    Pause,
    /// Blacklisted exploiters are rejected in every position
    Blacklist,
    /// Withdrawal fees accrue to the treasury
    Treasury,
    /// All of the above, each on its own fresh fork
    All,
}

impl ScenarioKind {
    pub fn all() -> [ScenarioKind; 3] {
        [
            ScenarioKind::Pause,
            ScenarioKind::Blacklist,
            ScenarioKind::Treasury,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Pause => "pause",
            ScenarioKind::Blacklist => "blacklist",
            ScenarioKind::Treasury => "treasury",
            ScenarioKind::All => "all",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ScenarioKind::Pause => "GAC pause locks the vault, governance unpause restores it",
            ScenarioKind::Blacklist => "blacklisted exploiters locked out of every operation",
            ScenarioKind::Treasury => "withdrawal fees accrue to the treasury only",
            ScenarioKind::All => "every scenario, each on a fresh fork",
        }
    }
}
