//! CLI for inspecting and simulating APN retry policies.

mod commands;

use anyhow::Result;
use apnretry_core::config::ApnRetryConfig;
use apnretry_core::{TunnelError, UnthrottleEvent};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_match, run_simulate, run_status, run_validate, SimulateArgs};

/// Top-level CLI for the APN retry engine.
#[derive(Debug, Parser)]
#[command(name = "apnretry")]
#[command(about = "apnretry: inspect and simulate APN tunnel retry policies", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate a carrier policy file (JSON).
    Validate {
        /// Path to the carrier policy file.
        path: PathBuf,
    },

    /// Show which policy a report would match.
    Match {
        /// APN name, e.g. "ims".
        #[arg(long)]
        apn: String,
        /// Error descriptor: "none", "protocol:<code>" or "generic:<kind>".
        #[arg(long)]
        error: TunnelError,
        /// Carrier policy file; defaults to the configured one.
        #[arg(long, value_name = "PATH")]
        policy: Option<PathBuf>,
    },

    /// Report the same error repeatedly and print each decision.
    Simulate {
        #[arg(long)]
        apn: String,
        #[arg(long)]
        error: TunnelError,
        /// Number of reports (default 5).
        #[arg(long, default_value = "5", value_name = "N")]
        count: usize,
        /// Carrier policy file; defaults to the configured one.
        #[arg(long, value_name = "PATH")]
        policy: Option<PathBuf>,
        /// Use this delay for every report instead of the policy schedule.
        #[arg(long, value_name = "SECS")]
        explicit_delay_secs: Option<u64>,
        /// Number of alternate server identities to rotate among.
        #[arg(long, default_value = "1", value_name = "N")]
        alternates: usize,
        /// Deliver this event after the reports, e.g. APM_ENABLE_EVENT.
        #[arg(long)]
        event: Option<UnthrottleEvent>,
    },

    /// Show configured slots and which policy table each uses.
    Status,
}

impl CliCommand {
    pub fn run_from_args(cfg: &ApnRetryConfig) -> Result<()> {
        let cli = Cli::parse();
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Validate { path } => run_validate(&path)?,
            CliCommand::Match { apn, error, policy } => {
                run_match(cfg, policy.as_deref(), &apn, error)?
            }
            CliCommand::Simulate {
                apn,
                error,
                count,
                policy,
                explicit_delay_secs,
                alternates,
                event,
            } => run_simulate(
                cfg,
                policy.as_deref(),
                SimulateArgs {
                    apn,
                    error,
                    count,
                    explicit_delay_secs,
                    alternates,
                    event,
                },
            )?,
            CliCommand::Status => run_status(cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
