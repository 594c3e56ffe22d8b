//! # NIC Subcommand
//!
//! Parses a NIC number and reports its format, canonical form, day value
//! and the sex it encodes.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use fincore_core::{derive_sex, Nic, NicError, NicFormat, Sex};

use crate::{EXIT_INVALID, EXIT_OK};

/// Arguments for the `fincore nic` subcommand.
#[derive(Args, Debug)]
pub struct NicArgs {
    #[command(subcommand)]
    pub command: NicCommand,
}

/// NIC subcommands.
#[derive(Subcommand, Debug)]
pub enum NicCommand {
    /// Parse a NIC number and show what it encodes.
    Parse {
        /// NIC number, e.g. 856234567V or 198523445678.
        code: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// What a parsed NIC encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NicReport {
    pub canonical: String,
    pub format: NicFormat,
    pub day_value: u16,
    pub sex: Sex,
}

impl From<&Nic> for NicReport {
    fn from(nic: &Nic) -> Self {
        Self {
            canonical: nic.canonical(),
            format: nic.format(),
            day_value: nic.day_value(),
            sex: derive_sex(nic),
        }
    }
}

/// Parse `code` into a report.
pub fn describe(code: &str) -> Result<NicReport, NicError> {
    Nic::parse(code).map(|nic| NicReport::from(&nic))
}

/// Execute the `nic` subcommand.
pub fn run_nic(args: &NicArgs) -> Result<u8> {
    match &args.command {
        NicCommand::Parse { code, json } => cmd_parse(code, *json),
    }
}

fn cmd_parse(code: &str, json: bool) -> Result<u8> {
    let report = match describe(code) {
        Ok(report) => report,
        Err(e) => {
            tracing::debug!(error = %e, "NIC parse failed");
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "valid": false,
                        "error": e.to_string(),
                    }))?
                );
            } else {
                eprintln!("INVALID: {e}");
            }
            return Ok(EXIT_INVALID);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("NIC: {}", report.canonical);
        println!("  Format: {}", report.format);
        println!("  Day value: {:03}", report.day_value);
        println!("  Sex: {}", report.sex);
    }
    Ok(EXIT_OK)
}
