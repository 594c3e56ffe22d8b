//! # fincore CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fincore_cli::check::{run_check, CheckArgs};
use fincore_cli::nic::{run_nic, NicArgs};
use fincore_cli::EXIT_INVALID;

/// Fincore onboarding CLI
///
/// Parses Sri Lankan NIC numbers and runs the loan eligibility gate.
#[derive(Parser, Debug)]
#[command(name = "fincore", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect NIC numbers.
    Nic(NicArgs),

    /// Run the eligibility gate for one applicant.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("fincore CLI starting");

    let result = match cli.command {
        Commands::Nic(args) => run_nic(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}
