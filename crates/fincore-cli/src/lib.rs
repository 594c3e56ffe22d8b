//! # fincore-cli: CLI Tool for Fincore Onboarding
//!
//! Provides the `fincore` command-line interface over [`fincore_core`].
//!
//! ## Subcommands
//!
//! - `fincore nic parse`: Parse a NIC and show what it encodes.
//! - `fincore check`: Run the loan eligibility gate for one applicant.
//!
//! ```bash
//! fincore nic parse 856234567V
//! fincore check 198523445678 --gender female --json
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Parsed / accepted |
//! | 1 | Invalid NIC (`nic parse`) or unexpected error |
//! | 2 | Applicant rejected (`check`) |

pub mod check;
pub mod nic;

/// Exit code for a successful command.
pub const EXIT_OK: u8 = 0;

/// Exit code when the input is not a valid NIC.
pub const EXIT_INVALID: u8 = 1;

/// Exit code when the eligibility gate rejects the applicant.
pub const EXIT_REJECTED: u8 = 2;
