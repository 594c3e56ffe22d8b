#![deny(missing_docs)]

//! # fincore-core: Customer Onboarding Core
//!
//! Pure validation logic behind customer onboarding in the Fincore back
//! office. A Sri Lankan National Identity Card (NIC) number encodes the
//! holder's sex in a fixed three-digit day field; onboarding parses the NIC,
//! derives that sex, cross-checks it against the applicant's declaration and
//! applies the program's eligibility policy.
//!
//! ## Pipeline
//!
//! ```text
//! raw string ──► Nic::parse ──► derive_sex ──► EligibilityPolicy::evaluate
//!                   │                               │
//!                   └─ NicError                     └─ Accepted | Rejection
//! ```
//!
//! ## Crate Policy
//!
//! - No I/O, no shared mutable state. Every call is independent and safe
//!   to run from any number of threads.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Rejections are distinct enum variants. Callers branch on
//!   [`RejectionKind`], never on message text.

pub mod eligibility;
pub mod error;
pub mod nic;
pub mod sex;

pub use eligibility::{check_eligibility, Accepted, EligibilityPolicy, Rejection, RejectionKind};
pub use error::{NicError, ValidationError};
pub use nic::{Nic, NicFormat, NicShape};
pub use sex::{derive_sex, DeclaredGender, Sex};
