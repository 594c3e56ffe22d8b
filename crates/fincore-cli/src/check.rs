//! # Check Subcommand
//!
//! Runs the loan eligibility gate for one applicant and reports the
//! decision. Exits 0 when accepted and 2 when rejected.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use fincore_core::{DeclaredGender, EligibilityPolicy, NicFormat, RejectionKind, Sex};

use crate::{EXIT_OK, EXIT_REJECTED};

/// Gender as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for DeclaredGender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
            GenderArg::Other => Self::Other,
        }
    }
}

/// Arguments for the `fincore check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// NIC number of the applicant.
    pub code: String,

    /// Gender the applicant declared.
    #[arg(long, value_enum)]
    pub gender: GenderArg,

    /// Check against a program that enrolls this sex instead of women.
    #[arg(long, value_enum, default_value_t = SexArg::Female)]
    pub eligible: SexArg,

    /// Print the decision as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Program sex as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Self::Male,
            SexArg::Female => Self::Female,
        }
    }
}

/// Gate decision in a printable shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic_format: Option<NicFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionKind>,
    pub message: String,
}

/// Evaluate one applicant under a program enrolling `eligible`.
pub fn evaluate(code: &str, gender: DeclaredGender, eligible: Sex) -> CheckReport {
    match EligibilityPolicy::new(eligible).evaluate(code, gender) {
        Ok(accepted) => CheckReport {
            eligible: true,
            message: format!("{} applicant is eligible", accepted.sex),
            nic: Some(accepted.nic.canonical()),
            nic_format: Some(accepted.nic.format()),
            sex: Some(accepted.sex),
            rejection: None,
        },
        Err(rejection) => CheckReport {
            eligible: false,
            nic: None,
            nic_format: None,
            sex: None,
            rejection: Some(rejection.kind()),
            message: rejection.to_string(),
        },
    }
}

impl CheckReport {
    /// One-line text rendering; rejections name their kind.
    pub fn summary(&self) -> String {
        match self.rejection {
            None => format!("ACCEPTED: {}", self.message),
            Some(kind) => format!("REJECTED [{}]: {}", kind.as_str(), self.message),
        }
    }
}

/// Execute the `check` subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let report = evaluate(&args.code, args.gender.into(), args.eligible.into());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }

    Ok(if report.eligible { EXIT_OK } else { EXIT_REJECTED })
}
